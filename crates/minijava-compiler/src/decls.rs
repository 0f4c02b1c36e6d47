//! The declaration table.
//!
//! Every class, field, method, parameter and local variable of one
//! compilation lives here, addressed by [`DeclId`]. The resolver creates the
//! entries and the syntax tree points at them; the code generator later fills
//! in each entry's storage slot exactly once.

use minijava_ast::MemberFlags;
use minijava_core::{DeclId, Span, Type};
use rustc_hash::FxHashMap;

use crate::error::CodegenError;

// ============================================================================
// Types
// ============================================================================

/// One declaration.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclKind,
    /// Declared type. For methods this is the return type; for classes the
    /// class type itself.
    pub ty: Type,
    pub span: Span,
    /// Offset from a base register, code address (methods) or instance field
    /// count (classes). Unset until layout or emission reaches it.
    slot: Option<i32>,
}

/// What a [`Declaration`] declares.
#[derive(Debug, Clone)]
pub enum DeclKind {
    Class(ClassInfo),
    Field { class: DeclId, flags: MemberFlags },
    Method(MethodInfo),
    Param,
    Local,
    /// The read-only `length` pseudo-field shared by all arrays.
    ArrayLength,
}

/// Members of a class.
#[derive(Debug, Clone, Default)]
pub struct ClassInfo {
    /// Every member by name.
    pub members: FxHashMap<String, DeclId>,
    /// Non-private members by name, for access from other classes.
    pub public: FxHashMap<String, DeclId>,
    /// Fields in declaration order.
    pub fields: Vec<DeclId>,
    /// Methods in declaration order.
    pub methods: Vec<DeclId>,
}

/// Signature of a method.
#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub class: DeclId,
    pub flags: MemberFlags,
    pub params: Vec<DeclId>,
}

// ============================================================================
// DeclTable
// ============================================================================

/// Arena of declarations for one compilation.
#[derive(Debug, Default)]
pub struct DeclTable {
    decls: Vec<Declaration>,
    /// Classes in registration order (built-ins first).
    classes: Vec<DeclId>,
}

impl DeclTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration and return its id.
    pub fn add(&mut self, name: impl Into<String>, kind: DeclKind, ty: Type, span: Span) -> DeclId {
        let id = DeclId::new(self.decls.len() as u32);
        if matches!(kind, DeclKind::Class(_)) {
            self.classes.push(id);
        }
        self.decls.push(Declaration {
            name: name.into(),
            kind,
            ty,
            span,
            slot: None,
        });
        id
    }

    /// Add a class. Its type is set to refer to itself.
    pub fn add_class(&mut self, name: impl Into<String>, span: Span) -> DeclId {
        let id = DeclId::new(self.decls.len() as u32);
        let kind = DeclKind::Class(ClassInfo::default());
        self.add(name, kind, Type::Class(id), span)
    }

    /// Add a field or method to `class`, recording it in the member maps.
    ///
    /// Returns `None` if the class already has a member with that name.
    pub fn add_member(
        &mut self,
        class: DeclId,
        name: &str,
        kind: DeclKind,
        ty: Type,
        span: Span,
    ) -> Option<DeclId> {
        if self.class_info(class)?.members.contains_key(name) {
            return None;
        }
        let (is_field, is_public) = match &kind {
            DeclKind::Field { flags, .. } => (true, !flags.contains(MemberFlags::PRIVATE)),
            DeclKind::Method(info) => (false, !info.flags.contains(MemberFlags::PRIVATE)),
            _ => return None,
        };
        let id = self.add(name, kind, ty, span);
        let info = self.class_info_mut(class)?;
        info.members.insert(name.to_string(), id);
        if is_public {
            info.public.insert(name.to_string(), id);
        }
        if is_field {
            info.fields.push(id);
        } else {
            info.methods.push(id);
        }
        Some(id)
    }

    pub fn get(&self, id: DeclId) -> &Declaration {
        &self.decls[id.index()]
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Classes in registration order.
    pub fn classes(&self) -> &[DeclId] {
        &self.classes
    }

    pub fn class_info(&self, id: DeclId) -> Option<&ClassInfo> {
        match &self.get(id).kind {
            DeclKind::Class(info) => Some(info),
            _ => None,
        }
    }

    fn class_info_mut(&mut self, id: DeclId) -> Option<&mut ClassInfo> {
        match &mut self.decls[id.index()].kind {
            DeclKind::Class(info) => Some(info),
            _ => None,
        }
    }

    pub fn method_info(&self, id: DeclId) -> Option<&MethodInfo> {
        match &self.get(id).kind {
            DeclKind::Method(info) => Some(info),
            _ => None,
        }
    }

    /// Attach parameters to a method once their declarations exist.
    pub fn set_params(&mut self, method: DeclId, params: Vec<DeclId>) {
        if let DeclKind::Method(info) = &mut self.decls[method.index()].kind {
            info.params = params;
        }
    }

    pub fn is_class(&self, id: DeclId) -> bool {
        matches!(self.get(id).kind, DeclKind::Class(_))
    }

    pub fn is_method(&self, id: DeclId) -> bool {
        matches!(self.get(id).kind, DeclKind::Method(_))
    }

    pub fn is_field(&self, id: DeclId) -> bool {
        matches!(self.get(id).kind, DeclKind::Field { .. })
    }

    /// Whether a member is static. Non-members are never static.
    pub fn is_static(&self, id: DeclId) -> bool {
        match &self.get(id).kind {
            DeclKind::Field { flags, .. } => flags.contains(MemberFlags::STATIC),
            DeclKind::Method(info) => info.flags.contains(MemberFlags::STATIC),
            _ => false,
        }
    }

    // ==========================================================================
    // Storage slots
    // ==========================================================================

    pub fn slot(&self, id: DeclId) -> Option<i32> {
        self.get(id).slot
    }

    /// Slot that must already be assigned.
    pub fn expect_slot(&self, id: DeclId) -> Result<i32, CodegenError> {
        self.slot(id)
            .ok_or(CodegenError::SlotUnassigned { decl: id })
    }

    /// Assign a slot. Each declaration receives exactly one.
    pub fn set_slot(&mut self, id: DeclId, value: i32) -> Result<(), CodegenError> {
        let decl = &mut self.decls[id.index()];
        if decl.slot.is_some() {
            return Err(CodegenError::SlotReassigned { decl: id });
        }
        decl.slot = Some(value);
        Ok(())
    }
}
