//! Type table and symbol table entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Span, TypeId};

/// Primitive types of the host language, including untyped constant kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UntypedBool,
    UntypedInt,
    UntypedRune,
    UntypedFloat,
    UntypedString,
    UntypedNil,
}

impl BasicKind {
    /// Source spelling of the kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Uintptr => "uintptr",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
            Self::String => "string",
            Self::UntypedBool => "untyped bool",
            Self::UntypedInt => "untyped int",
            Self::UntypedRune => "untyped rune",
            Self::UntypedFloat => "untyped float",
            Self::UntypedString => "untyped string",
            Self::UntypedNil => "untyped nil",
        }
    }

    pub fn is_untyped(self) -> bool {
        matches!(
            self,
            Self::UntypedBool
                | Self::UntypedInt
                | Self::UntypedRune
                | Self::UntypedFloat
                | Self::UntypedString
                | Self::UntypedNil
        )
    }

    /// Integer kinds that can be narrowed to `uint8` without changing the
    /// meaning of a small constant set. `int8` and `uint8` are already
    /// byte-sized; `uintptr` is excluded.
    pub fn is_wide_integer(self) -> bool {
        matches!(
            self,
            Self::Int
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::Uint
                | Self::Uint16
                | Self::Uint32
                | Self::Uint64
        )
    }
}

impl fmt::Display for BasicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Receiver flavour of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Receiver {
    /// `func (t T) M()`: in the method set of both `T` and `*T`.
    Value,
    /// `func (t *T) M()`: in the method set of `*T` only.
    Pointer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    #[serde(default)]
    pub name: Option<String>,
    pub ty: TypeId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub results: Vec<TypeId>,
    #[serde(default)]
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub receiver: Receiver,
    pub signature: Signature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeId,
}

/// An entry of the type table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Type {
    Basic(BasicKind),
    Named {
        name: String,
        /// Declaring package; `None` for predeclared types such as `error`.
        #[serde(default)]
        package: Option<String>,
        underlying: TypeId,
        #[serde(default)]
        methods: Vec<Method>,
    },
    Pointer(TypeId),
    Slice(TypeId),
    Struct {
        fields: Vec<FieldDef>,
    },
    Signature(Signature),
    Interface {
        #[serde(default)]
        methods: Vec<String>,
    },
}

/// A compile-time constant value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstValue {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{:?}", v),
            Self::Bool(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Const { value: ConstValue },
    Var,
    TypeName,
    Func,
    Field,
    Param,
}

/// A declared object: what an identifier resolves to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: TypeId,
    /// Declaring identifier's span. `None` when the host has no position
    /// (predeclared objects, synthesized symbols).
    #[serde(default)]
    pub pos: Option<Span>,
}

impl Symbol {
    pub fn is_const(&self) -> bool {
        matches!(self.kind, SymbolKind::Const { .. })
    }

    pub fn is_var(&self) -> bool {
        matches!(self.kind, SymbolKind::Var | SymbolKind::Param)
    }

    pub fn const_value(&self) -> Option<&ConstValue> {
        match &self.kind {
            SymbolKind::Const { value } => Some(value),
            _ => None,
        }
    }
}
