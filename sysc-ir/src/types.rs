//! IR Type System
//!
//! Defines the value types the IR can reference: void, label, integers,
//! pointers, arrays and functions.
//!
//! Types are shared through [`TypeRef`]. The primitive kinds are
//! process-wide singletons, so two requests for `i32` hand back the same
//! allocation and [`Type::same`] can compare them by identity. Pointer,
//! array and function types are not interned: every request allocates a
//! fresh instance. Use `==` when structural equality is what you want.

use std::fmt;
use std::sync::{Arc, OnceLock};

/// Shared handle to a type. Types are immutable once created.
pub type TypeRef = Arc<Type>;

/// IR Type system
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Void type
    Void,

    /// Label type (for basic block addresses)
    Label,

    /// Integer type with bit width
    Integer(u32),

    /// Function type
    Function {
        return_type: TypeRef,
        param_types: Vec<TypeRef>,
    },

    /// Pointer type
    Pointer(TypeRef),

    /// Array type [num_elements x element_type]
    Array {
        element_type: TypeRef,
        num_elements: u64,
    },
}

fn singleton(cell: &'static OnceLock<TypeRef>, init: fn() -> Type) -> TypeRef {
    Arc::clone(cell.get_or_init(|| Arc::new(init())))
}

impl Type {
    pub fn void() -> TypeRef {
        static VOID: OnceLock<TypeRef> = OnceLock::new();
        singleton(&VOID, || Type::Void)
    }

    pub fn label() -> TypeRef {
        static LABEL: OnceLock<TypeRef> = OnceLock::new();
        singleton(&LABEL, || Type::Label)
    }

    /// The canonical `i1`, used for comparison results.
    pub fn int1() -> TypeRef {
        static INT1: OnceLock<TypeRef> = OnceLock::new();
        singleton(&INT1, || Type::Integer(1))
    }

    pub fn int32() -> TypeRef {
        static INT32: OnceLock<TypeRef> = OnceLock::new();
        singleton(&INT32, || Type::Integer(32))
    }

    /// The canonical `i32*`. Unlike [`Type::pointer`], this one is shared.
    pub fn int32_ptr() -> TypeRef {
        static INT32_PTR: OnceLock<TypeRef> = OnceLock::new();
        singleton(&INT32_PTR, || Type::Pointer(Type::int32()))
    }

    /// Integer type of arbitrary width. Widths 1 and 32 resolve to the
    /// singletons; any other width is a fresh instance.
    pub fn integer(width: u32) -> TypeRef {
        match width {
            1 => Type::int1(),
            32 => Type::int32(),
            _ => Arc::new(Type::Integer(width)),
        }
    }

    pub fn pointer(pointee: TypeRef) -> TypeRef {
        Arc::new(Type::Pointer(pointee))
    }

    pub fn array(element_type: TypeRef, num_elements: u64) -> TypeRef {
        Arc::new(Type::Array { element_type, num_elements })
    }

    pub fn function(return_type: TypeRef, param_types: Vec<TypeRef>) -> TypeRef {
        Arc::new(Type::Function { return_type, param_types })
    }

    /// Identity comparison: true only if both handles point at the same instance.
    pub fn same(a: &TypeRef, b: &TypeRef) -> bool {
        Arc::ptr_eq(a, b)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_label(&self) -> bool {
        matches!(self, Type::Label)
    }

    /// Check if this is an integer type
    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Integer(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function { .. })
    }

    /// Check if this is a pointer type
    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Pointer(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array { .. })
    }

    pub fn bit_width(&self) -> Option<u32> {
        match self {
            Type::Integer(width) => Some(*width),
            _ => None,
        }
    }

    /// The type a pointer points to
    pub fn pointee(&self) -> Option<&TypeRef> {
        match self {
            Type::Pointer(pointee) => Some(pointee),
            _ => None,
        }
    }

    /// Get the element type for pointers and arrays
    pub fn element_type(&self) -> Option<&TypeRef> {
        match self {
            Type::Pointer(elem) => Some(elem),
            Type::Array { element_type, .. } => Some(element_type),
            _ => None,
        }
    }

    pub fn num_elements(&self) -> Option<u64> {
        match self {
            Type::Array { num_elements, .. } => Some(*num_elements),
            _ => None,
        }
    }

    pub fn return_type(&self) -> Option<&TypeRef> {
        match self {
            Type::Function { return_type, .. } => Some(return_type),
            _ => None,
        }
    }

    pub fn param_types(&self) -> Option<&[TypeRef]> {
        match self {
            Type::Function { param_types, .. } => Some(param_types),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Label => write!(f, "label"),
            Type::Integer(width) => write!(f, "i{width}"),
            Type::Pointer(target) => write!(f, "{target}*"),
            Type::Array { element_type, num_elements } => write!(f, "[{num_elements} x {element_type}]"),
            Type::Function { return_type, param_types } => {
                write!(f, "{return_type} (")?;
                for (i, param) in param_types.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{param}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_are_singletons() {
        assert!(Type::same(&Type::void(), &Type::void()));
        assert!(Type::same(&Type::label(), &Type::label()));
        assert!(Type::same(&Type::int1(), &Type::int1()));
        assert!(Type::same(&Type::int32(), &Type::int32()));
        assert!(Type::same(&Type::integer(32), &Type::int32()));
        assert!(Type::same(&Type::integer(1), &Type::int1()));
        assert!(Type::same(&Type::int32_ptr(), &Type::int32_ptr()));
        assert!(!Type::same(&Type::int1(), &Type::int32()));
    }

    #[test]
    fn composites_are_not_interned() {
        let p1 = Type::pointer(Type::int32());
        let p2 = Type::pointer(Type::int32());
        assert!(!Type::same(&p1, &p2));
        assert_eq!(p1, p2);
        assert!(!Type::same(&p1, &Type::int32_ptr()));

        let a1 = Type::array(Type::int32(), 4);
        let a2 = Type::array(Type::int32(), 4);
        assert!(!Type::same(&a1, &a2));
        assert_eq!(a1, a2);

        let f1 = Type::function(Type::void(), vec![Type::int32()]);
        let f2 = Type::function(Type::void(), vec![Type::int32()]);
        assert!(!Type::same(&f1, &f2));
        assert_eq!(f1, f2);

        assert!(!Type::same(&Type::integer(8), &Type::integer(8)));
    }

    #[test]
    fn type_rendering() {
        assert_eq!(Type::void().to_string(), "void");
        assert_eq!(Type::label().to_string(), "label");
        assert_eq!(Type::int1().to_string(), "i1");
        assert_eq!(Type::integer(64).to_string(), "i64");
        assert_eq!(Type::int32_ptr().to_string(), "i32*");
        assert_eq!(Type::pointer(Type::int32_ptr()).to_string(), "i32**");
        assert_eq!(Type::array(Type::int32(), 10).to_string(), "[10 x i32]");
        assert_eq!(
            Type::array(Type::array(Type::int32(), 3), 2).to_string(),
            "[2 x [3 x i32]]"
        );
        assert_eq!(
            Type::function(Type::int32(), vec![Type::int32(), Type::int32_ptr()]).to_string(),
            "i32 (i32, i32*)"
        );
        assert_eq!(Type::function(Type::void(), vec![]).to_string(), "void ()");
    }

    #[test]
    fn type_queries() {
        let arr = Type::array(Type::int32(), 8);
        assert!(arr.is_array());
        assert_eq!(arr.num_elements(), Some(8));
        assert!(Type::same(arr.element_type().unwrap(), &Type::int32()));

        let ptr = Type::pointer(arr.clone());
        assert!(ptr.is_pointer());
        assert!(Arc::ptr_eq(ptr.pointee().unwrap(), &arr));

        let func = Type::function(Type::int1(), vec![Type::int32()]);
        assert!(func.is_function());
        assert_eq!(func.param_types().map(<[TypeRef]>::len), Some(1));
        assert_eq!(func.return_type().and_then(|t| t.bit_width()), Some(1));
        assert_eq!(Type::int32().bit_width(), Some(32));
        assert!(Type::void().is_void());
        assert!(Type::label().is_label());
        assert!(Type::int32().pointee().is_none());
    }
}
