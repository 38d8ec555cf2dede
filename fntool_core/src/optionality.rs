//! Required/optional partitioning of parameters.

use crate::models::{ParamDescriptor, TypeDescriptor};

/// A parameter is required when it declares no default and its type does
/// not admit null. A default always makes it optional, whatever the type.
pub fn is_required(has_default: bool, ty: &TypeDescriptor) -> bool {
    !has_default && !ty.is_nullable()
}

impl ParamDescriptor {
    pub fn is_required(&self) -> bool {
        is_required(self.has_default, &self.ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_matrix() {
        let plain = TypeDescriptor::integer();
        let optional = TypeDescriptor::optional(TypeDescriptor::integer());

        assert!(is_required(false, &plain));
        assert!(!is_required(true, &plain));
        assert!(!is_required(false, &optional));
        assert!(!is_required(true, &optional));
    }

    #[test]
    fn test_only_top_level_nullability_counts() {
        // A list of optionals is still a required list.
        let list = TypeDescriptor::sequence(TypeDescriptor::optional(TypeDescriptor::string()));
        assert!(is_required(false, &list));

        // A plain union without null is required.
        let either = TypeDescriptor::union([TypeDescriptor::integer(), TypeDescriptor::string()]);
        assert!(is_required(false, &either));
    }

    #[test]
    fn test_param_descriptor_shortcut() {
        let limit = ParamDescriptor::new("limit", TypeDescriptor::integer()).with_default(json!(10));
        assert!(!limit.is_required());

        let query = ParamDescriptor::new("query", TypeDescriptor::string());
        assert!(query.is_required());
    }
}
