//! Identifiers, names and the shared resolution slot attached to them.

use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::ast::{Literal, Token, Type, TypeArguments, Wrap};
use crate::error::{Error, Result};
use crate::lang::Language;

/// A bare identifier and its token.
pub type Ident = Wrap<String>;

/// Qualified path segments, e.g. a package name. Never empty.
pub type DottedIdent = Vec<Ident>;

/// Unique id handed out by the naming pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SId(pub i64);

impl SId {
    pub const UNRESOLVED: SId = SId(-1);

    /// A process-unique id.
    pub fn fresh() -> SId {
        static COUNTER: AtomicI64 = AtomicI64::new(1);
        SId(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn is_unresolved(self) -> bool {
        self == Self::UNRESOLVED
    }
}

impl Default for SId {
    fn default() -> Self {
        Self::UNRESOLVED
    }
}

common_enum! {
    pub enum ModuleName {
        /// `import a.b.c`
        DottedName(DottedIdent),
        /// `import "./foo"`
        FileName(Wrap<String>),
    }
}

impl ModuleName {
    pub fn tokens(&self) -> Vec<&Token> {
        match self {
            ModuleName::DottedName(ids) => ids.iter().map(|id| &id.tok).collect(),
            ModuleName::FileName(file) => vec![&file.tok],
        }
    }
}

impl Display for ModuleName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleName::DottedName(ids) => {
                write!(f, "{}", ids.iter().map(|id| id.value.as_str()).join("."))
            }
            ModuleName::FileName(file) => write!(f, "{:?}", file.value),
        }
    }
}

common_enum! {
    pub enum ResolvedKind {
        Global,
        Local,
        Param,
        /// A variable of an enclosing function captured by a closure.
        EnclosedVar,
        ImportedEntity(DottedIdent),
        ImportedModule(ModuleName),
        TypeName,
        Macro,
        EnumConstant,
    }
}

common_struct! {
    pub struct ResolvedName {
        pub kind: ResolvedKind,
        pub sid: SId,
    }
}

common_tag! {
    pub enum ConstKind {
        Int,
        Str,
        Any,
    }
}

common_enum! {
    /// What constant folding learned about an identifier.
    pub enum Constness {
        Lit(Literal),
        Cst(ConstKind),
        NotCst,
    }
}

/// Facts later passes learn about an identifier occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdInfo {
    pub resolved: Option<ResolvedName>,
    pub ty: Option<Type>,
    pub constness: Option<Constness>,
}

/// Shared, mutable [`IdInfo`] slot.
///
/// Cloning a cell aliases it: every clone observes updates made through any
/// other clone. Equality compares contents, so two fresh cells are equal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdInfoCell(Arc<RwLock<IdInfo>>);

impl IdInfoCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_info(info: IdInfo) -> Self {
        Self(Arc::new(RwLock::new(info)))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, IdInfo> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, IdInfo> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current contents.
    pub fn get(&self) -> IdInfo {
        self.read().clone()
    }

    pub fn resolved(&self) -> Option<ResolvedName> {
        self.read().resolved.clone()
    }

    pub fn set_resolved(&self, resolved: ResolvedName) {
        self.write().resolved = Some(resolved);
    }

    pub fn set_type(&self, ty: Type) {
        self.write().ty = Some(ty);
    }

    pub fn set_constness(&self, constness: Constness) {
        self.write().constness = Some(constness);
    }

    pub fn ptr_eq(&self, other: &IdInfoCell) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared slot, stable for the cell's lifetime.
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for IdInfoCell {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.read() == *other.read()
    }
}

common_struct! {
    pub struct NameInfo {
        pub qualifier: Option<DottedIdent>,
        /// Explicit type arguments at an instantiation site.
        pub typeargs: Option<TypeArguments>,
    }
}

common_struct! {
    pub struct QualifiedName {
        pub ident: Ident,
        pub info: NameInfo,
    }
}

common_enum! {
    pub enum Name {
        Id(Ident, IdInfoCell),
        IdQualified(QualifiedName, IdInfoCell),
    }
}

impl Name {
    pub fn id(ident: Ident) -> Self {
        Name::Id(ident, IdInfoCell::new())
    }

    pub fn qualified(ident: Ident, info: NameInfo) -> Self {
        Name::IdQualified(QualifiedName { ident, info }, IdInfoCell::new())
    }

    pub fn ident(&self) -> &Ident {
        match self {
            Name::Id(ident, _) => ident,
            Name::IdQualified(name, _) => &name.ident,
        }
    }

    pub fn id_info(&self) -> &IdInfoCell {
        match self {
            Name::Id(_, info) | Name::IdQualified(_, info) => info,
        }
    }

    pub fn qualifier(&self) -> Option<&DottedIdent> {
        match self {
            Name::Id(..) => None,
            Name::IdQualified(name, _) => name.info.qualifier.as_ref(),
        }
    }

    pub fn typeargs(&self) -> Option<&TypeArguments> {
        match self {
            Name::Id(..) => None,
            Name::IdQualified(name, _) => name.info.typeargs.as_ref(),
        }
    }

    /// All segments, qualifier first.
    pub fn segments(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self
            .qualifier()
            .map(|q| q.iter().map(|id| id.value.as_str()).collect())
            .unwrap_or_default();
        out.push(self.ident().value.as_str());
        out
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments().join("."))
    }
}

/// Build a name from dotted segments: the last segment is the name itself and
/// the others, in order, its qualifier.
pub fn name_of_ids(language: Language, ids: DottedIdent) -> Result<Name> {
    name_of_ids_with_targs(language, ids.into_iter().map(|id| (None, id)).collect())
}

/// Like [`name_of_ids`], keeping the type arguments written on the last segment.
///
/// Type arguments of intermediate segments (`Outer<T>.Inner`) have no slot in a
/// qualifier and are dropped.
pub fn name_of_ids_with_targs(
    language: Language,
    mut segments: Vec<(Option<TypeArguments>, Ident)>,
) -> Result<Name> {
    let Some((typeargs, ident)) = segments.pop() else {
        return Err(Error::malformed(
            language,
            "qualified name",
            "empty identifier list",
        ));
    };
    if segments.is_empty() && typeargs.is_none() {
        return Ok(Name::id(ident));
    }
    let qualifier = if segments.is_empty() {
        None
    } else {
        Some(segments.into_iter().map(|(_, id)| id).collect())
    };
    Ok(Name::qualified(
        ident,
        NameInfo {
            qualifier,
            typeargs,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ResolvedKind, ResolvedName};

    fn id(name: &str) -> Ident {
        Wrap::fake(name.to_string(), name)
    }

    #[test]
    fn last_segment_is_the_name() {
        let name = name_of_ids(Language::Java, vec![id("pkg"), id("Sub"), id("Cls")]).unwrap();
        assert_eq!(name.ident().value, "Cls");
        let qualifier: Vec<_> = name
            .qualifier()
            .unwrap()
            .iter()
            .map(|id| id.value.as_str())
            .collect();
        assert_eq!(qualifier, vec!["pkg", "Sub"]);
        assert_eq!(name.to_string(), "pkg.Sub.Cls");
    }

    #[test]
    fn singleton_is_unqualified() {
        let name = name_of_ids(Language::Java, vec![id("Cls")]).unwrap();
        assert!(matches!(name, Name::Id(..)));
    }

    #[test]
    fn empty_list_is_malformed() {
        let err = name_of_ids(Language::Java, vec![]).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn aliased_cells_share_updates() {
        let cell = IdInfoCell::new();
        let alias = cell.clone();
        let sid = SId::fresh();
        alias.set_resolved(ResolvedName {
            kind: ResolvedKind::Local,
            sid,
        });
        assert!(cell.ptr_eq(&alias));
        assert_eq!(cell.resolved().map(|r| r.sid), Some(sid));
        assert_ne!(cell, IdInfoCell::new());
    }

    #[test]
    fn fresh_ids_are_unique() {
        let a = SId::fresh();
        let b = SId::fresh();
        assert_ne!(a, b);
        assert!(!a.is_unresolved());
        assert!(SId::default().is_unresolved());
    }
}
