use gast_core::ast::{
    name_of_ids, name_of_ids_with_targs, Any, Bracket, Ident, Name, OtherTypeOp, Type,
    TypeArgument, TypeArguments, TypeParameter, Wrap,
};
use gast_core::error::Result;
use gast_core::ts::{children, find_kind, named_children};
use tree_sitter::Node;

use super::Normalizer;

pub(super) type Segment = (Option<TypeArguments>, Ident);

impl<'s> Normalizer<'s> {
    pub(super) fn lower_type(&self, node: Node) -> Result<Type> {
        let ctx = &self.ctx;
        Ok(match node.kind() {
            "integral_type" | "floating_point_type" | "boolean_type" | "void_type" => {
                Type::builtin(ctx.text(node), ctx.tok(node))
            }
            "type_identifier" | "scoped_type_identifier" | "generic_type" => {
                Type::TyN(name_of_ids_with_targs(ctx.language, self.type_segments(node)?)?)
            }
            "array_type" => {
                let elem = self.lower_type(ctx.required(node, "element")?)?;
                self.wrap_dims(elem, Some(ctx.required(node, "dimensions")?))
            }
            "annotated_type" => {
                let mut payload = Vec::new();
                for child in named_children(node) {
                    if is_annotation(child) {
                        payload.push(Any::At(self.lower_annotation(child)?));
                    } else {
                        payload.push(Any::T(self.lower_type(child)?));
                    }
                }
                Type::OtherType(OtherTypeOp::Annotated, payload)
            }
            kind => {
                ctx.unsupported("type", node);
                Type::todo(kind, self.lower_children_any(node)?)
            }
        })
    }

    /// Segments of a possibly qualified, possibly generic class type.
    pub(super) fn type_segments(&self, node: Node) -> Result<Vec<Segment>> {
        let ctx = &self.ctx;
        match node.kind() {
            "type_identifier" | "identifier" => Ok(vec![(None, ctx.ident(node))]),
            "scoped_type_identifier" => {
                let parts: Vec<Node> = named_children(node)
                    .into_iter()
                    .filter(|c| !is_annotation(*c))
                    .collect();
                let Some((last, prefix)) = parts.split_last() else {
                    return Err(ctx.malformed(node, "empty scoped type"));
                };
                let mut segments = Vec::new();
                for part in prefix {
                    segments.extend(self.type_segments(*part)?);
                }
                segments.push((None, ctx.ident(*last)));
                Ok(segments)
            }
            "generic_type" => {
                let base = ctx.first_named(node)?;
                let mut segments = self.type_segments(base)?;
                if let (Some(args), Some(last)) =
                    (find_kind(node, "type_arguments"), segments.last_mut())
                {
                    last.0 = Some(self.lower_type_arguments(args)?);
                }
                Ok(segments)
            }
            _ => Err(ctx.malformed(node, "expected a class type")),
        }
    }

    pub(super) fn lower_type_arguments(&self, node: Node) -> Result<TypeArguments> {
        let ctx = &self.ctx;
        let mut args = Vec::new();
        for child in named_children(node) {
            let arg = if child.kind() == "wildcard" {
                let question = ctx.token_of(child, "?");
                let bound = match named_children(child)
                    .into_iter()
                    .filter(|c| !is_annotation(*c))
                    .collect::<Vec<_>>()
                    .as_slice()
                {
                    [sup, ty] if sup.kind() == "super" => {
                        Some((Wrap::new(false, ctx.tok(*sup)), self.lower_type(*ty)?))
                    }
                    [ty] => Some((
                        Wrap::new(true, ctx.token_of(child, "extends")),
                        self.lower_type(*ty)?,
                    )),
                    _ => None,
                };
                TypeArgument::Wildcard(question, bound)
            } else {
                TypeArgument::TypeArg(self.lower_type(child)?)
            };
            args.push(arg);
        }
        Ok(Bracket::new(
            ctx.token_of(node, "<"),
            args,
            ctx.token_of(node, ">"),
        ))
    }

    pub(super) fn lower_type_parameters(&self, node: Option<Node>) -> Result<Vec<TypeParameter>> {
        let ctx = &self.ctx;
        let Some(node) = node else {
            return Ok(Vec::new());
        };
        let mut params = Vec::new();
        for param in named_children(node) {
            if param.kind() != "type_parameter" {
                continue;
            }
            let mut name = None;
            let mut bounds = Vec::new();
            for child in named_children(param) {
                match child.kind() {
                    "type_identifier" | "identifier" => name = Some(ctx.ident(child)),
                    "type_bound" => {
                        for bound in named_children(child) {
                            bounds.push(self.lower_type(bound)?);
                        }
                    }
                    _ => {}
                }
            }
            let name = name.ok_or_else(|| ctx.malformed(param, "type parameter without a name"))?;
            params.push(TypeParameter { name, bounds });
        }
        Ok(params)
    }

    /// Wrap `ty` once per `[]` pair of a `dimensions` node.
    pub(super) fn wrap_dims(&self, mut ty: Type, dims: Option<Node>) -> Type {
        let ctx = &self.ctx;
        let Some(dims) = dims else {
            return ty;
        };
        let mut open = None;
        for child in children(dims) {
            match child.kind() {
                "[" => open = Some(ctx.tok(child)),
                "]" => {
                    if let Some(open) = open.take() {
                        ty = Type::array(open, None, ctx.tok(child), ty);
                    }
                }
                _ => {}
            }
        }
        ty
    }

    /// `a.b.c` written with `scoped_identifier`, as identifiers in order.
    pub(super) fn scoped_ids(&self, node: Node) -> Result<Vec<Ident>> {
        let ctx = &self.ctx;
        match node.kind() {
            "identifier" | "type_identifier" => Ok(vec![ctx.ident(node)]),
            "scoped_identifier" => {
                let mut ids = self.scoped_ids(ctx.required(node, "scope")?)?;
                ids.push(ctx.ident(ctx.required(node, "name")?));
                Ok(ids)
            }
            _ => Err(ctx.malformed(node, "expected a dotted identifier")),
        }
    }

    pub(super) fn scoped_name(&self, node: Node) -> Result<Name> {
        name_of_ids(self.ctx.language, self.scoped_ids(node)?)
    }
}

pub(super) fn is_annotation(node: Node) -> bool {
    matches!(node.kind(), "annotation" | "marker_annotation")
}
