//! Definitions: an [`Entity`] (what is being defined) plus a
//! [`DefinitionKind`] (how it is defined).

use crate::ast::{
    Any, Arguments, BStmt, Bracket, DottedIdent, Expr, Ident, IdInfoCell, Name, Pattern, Stmt,
    Token, Type, TypeParameter, Wrap,
};

common_tag! {
    pub enum Keyword {
        Static,
        Volatile,
        Extern,
        Public,
        Private,
        Protected,
        Abstract,
        Final,
        Override,
        Var,
        Let,
        Mutable,
        Const,
        Optional,
        NotNull,
        Generator,
        Async,
        Inline,
        Ctor,
        Dtor,
        Getter,
        Setter,
        Default,
        Transient,
        Synchronized,
        Native,
        StrictFp,
        Sealed,
        NonSealed,
    }
}

impl Keyword {
    /// Modifier keyword spelled the Java/JavaScript way.
    pub fn from_modifier(text: &str) -> Option<Keyword> {
        Some(match text {
            "static" => Keyword::Static,
            "volatile" => Keyword::Volatile,
            "public" => Keyword::Public,
            "private" => Keyword::Private,
            "protected" => Keyword::Protected,
            "abstract" => Keyword::Abstract,
            "final" => Keyword::Final,
            "default" => Keyword::Default,
            "transient" => Keyword::Transient,
            "synchronized" => Keyword::Synchronized,
            "native" => Keyword::Native,
            "strictfp" => Keyword::StrictFp,
            "sealed" => Keyword::Sealed,
            "non-sealed" => Keyword::NonSealed,
            "async" => Keyword::Async,
            "var" => Keyword::Var,
            "let" => Keyword::Let,
            "const" => Keyword::Const,
            "get" => Keyword::Getter,
            "set" => Keyword::Setter,
            _ => return None,
        })
    }
}

common_enum! {
    pub enum OtherAttributeOp {
        Todo(String),
    }
}

common_enum! {
    pub enum Attribute {
        KeywordAttr(Wrap<Keyword>),
        /// `@Name(args)`; decorators and annotations.
        NamedAttr(Token, Name, Arguments),
        OtherAttribute(OtherAttributeOp, Vec<Any>),
    }
}

impl Attribute {
    pub fn keyword(kw: Keyword, tok: Token) -> Attribute {
        Attribute::KeywordAttr(Wrap::new(kw, tok))
    }
}

common_struct! {
    pub struct Entity {
        pub name: Ident,
        pub attrs: Vec<Attribute>,
        pub tparams: Vec<TypeParameter>,
        pub info: IdInfoCell,
    }
}

impl Entity {
    pub fn basic(name: Ident) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            tparams: Vec::new(),
            info: IdInfoCell::new(),
        }
    }

    pub fn with_attrs(mut self, attrs: Vec<Attribute>) -> Self {
        self.attrs = attrs;
        self
    }

    pub fn with_tparams(mut self, tparams: Vec<TypeParameter>) -> Self {
        self.tparams = tparams;
        self
    }

    pub fn has_keyword(&self, kw: Keyword) -> bool {
        self.attrs
            .iter()
            .any(|attr| matches!(attr, Attribute::KeywordAttr(w) if w.value == kw))
    }
}

common_enum! {
    pub enum OtherParamOp {
        /// Java receiver parameter `Foo this`.
        Receiver,
        Todo(String),
    }
}

common_struct! {
    pub struct ParameterClassic {
        /// newvar
        pub name: Option<Ident>,
        pub ty: Option<Type>,
        pub default: Option<Expr>,
        pub attrs: Vec<Attribute>,
        pub info: IdInfoCell,
    }
}

impl ParameterClassic {
    pub fn named(name: Ident) -> Self {
        Self {
            name: Some(name),
            ty: None,
            default: None,
            attrs: Vec::new(),
            info: IdInfoCell::new(),
        }
    }

    pub fn with_type(mut self, ty: Option<Type>) -> Self {
        self.ty = ty;
        self
    }

    pub fn with_default(mut self, default: Option<Expr>) -> Self {
        self.default = default;
        self
    }

    pub fn with_attrs(mut self, attrs: Vec<Attribute>) -> Self {
        self.attrs = attrs;
        self
    }
}

common_enum! {
    pub enum Parameter {
        Classic(ParameterClassic),
        /// Destructuring parameter; newvar for every bound identifier.
        Pattern(Pattern),
        /// `...xs`, `*args`, `String... xs`
        Rest(Token, ParameterClassic),
        /// `**kwargs`
        HashSplat(Token, ParameterClassic),
        Ellipsis(Token),
        OtherParam(OtherParamOp, Vec<Any>),
    }
}

impl Parameter {
    pub fn name(&self) -> Option<&Ident> {
        match self {
            Parameter::Classic(p) | Parameter::Rest(_, p) | Parameter::HashSplat(_, p) => {
                p.name.as_ref()
            }
            _ => None,
        }
    }
}

common_tag! {
    pub enum FunctionKind {
        Function,
        Method,
        Arrow,
        LambdaKind,
    }
}

common_struct! {
    /// newscope: parameters and body share a fresh scope.
    pub struct FunctionDefinition {
        pub kind: Wrap<FunctionKind>,
        pub params: Bracket<Vec<Parameter>>,
        pub ret_type: Option<Type>,
        pub body: BStmt,
    }
}

common_struct! {
    pub struct VariableDefinition {
        pub init: Option<Expr>,
        pub ty: Option<Type>,
    }
}

common_enum! {
    pub enum OtherTypeKindOp {
        Todo(String),
    }
}

common_enum! {
    pub enum OrTypeElement {
        OrConstructor(Ident, Vec<Type>),
        OrEnum(Ident, Option<Expr>),
        OrUnion(Ident, Type),
        OtherOr(OtherTypeKindOp, Vec<Any>),
    }
}

common_enum! {
    pub enum TypeDefinitionKind {
        OrType(Vec<OrTypeElement>),
        AndType(Bracket<Vec<Field>>),
        AliasType(Type),
        NewType(Type),
        Exception(Ident, Vec<Type>),
        OtherTypeKind(OtherTypeKindOp, Vec<Any>),
    }
}

common_struct! {
    pub struct TypeDefinition {
        pub kind: TypeDefinitionKind,
    }
}

common_tag! {
    pub enum ClassKind {
        Class,
        Interface,
        Trait,
        Object,
        RecordClass,
        EnumClass,
        AtInterface,
    }
}

common_enum! {
    pub enum Field {
        FieldStmt(Stmt),
        /// `...obj` inside an object literal.
        FieldSpread(Token, Expr),
    }
}

common_struct! {
    pub struct ClassDefinition {
        pub kind: Wrap<ClassKind>,
        pub extends: Vec<Type>,
        pub implements: Vec<Type>,
        pub mixins: Vec<Type>,
        /// Record components, primary constructor parameters.
        pub params: Vec<Parameter>,
        pub body: Bracket<Vec<Field>>,
    }
}

common_struct! {
    /// A constant of an enum class, with its constructor arguments and body.
    pub struct EnumEntryDefinition {
        pub args: Option<Arguments>,
        pub body: Option<Bracket<Vec<Field>>>,
    }
}

common_enum! {
    pub enum OtherModuleOp {
        Todo(String),
    }
}

common_enum! {
    pub enum ModuleDefinitionKind {
        ModuleAlias(DottedIdent),
        /// newscope
        ModuleStruct(Option<DottedIdent>, Vec<Stmt>),
        OtherModule(OtherModuleOp, Vec<Any>),
    }
}

common_struct! {
    pub struct ModuleDefinition {
        pub kind: ModuleDefinitionKind,
    }
}

common_struct! {
    pub struct MacroDefinition {
        pub params: Vec<Ident>,
        pub body: Vec<Any>,
    }
}

common_enum! {
    pub enum DefinitionKind {
        FuncDef(FunctionDefinition),
        VarDef(VariableDefinition),
        TypeDef(TypeDefinition),
        ClassDef(ClassDefinition),
        ModuleDef(ModuleDefinition),
        MacroDef(MacroDefinition),
        /// Declaration without a body, e.g. an abstract method.
        Signature(Type),
        /// `global x`, `nonlocal x`: the entity refers to an outer declaration.
        UseOuterDecl(Token),
        EnumEntryDef(EnumEntryDefinition),
    }
}

common_struct! {
    pub struct Definition {
        pub entity: Entity,
        pub kind: DefinitionKind,
    }
}

impl Definition {
    pub fn new(entity: Entity, kind: DefinitionKind) -> Self {
        Self { entity, kind }
    }

    pub fn name(&self) -> &str {
        &self.entity.name.value
    }

    pub fn as_function(&self) -> Option<&FunctionDefinition> {
        match &self.kind {
            DefinitionKind::FuncDef(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassDefinition> {
        match &self.kind {
            DefinitionKind::ClassDef(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&VariableDefinition> {
        match &self.kind {
            DefinitionKind::VarDef(def) => Some(def),
            _ => None,
        }
    }
}
