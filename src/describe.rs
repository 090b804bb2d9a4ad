//! Short type-and-identity descriptions for trace messages.

/// A loggable entity that can describe itself in one short token.
///
/// Meant for trace lines that mention an object without dumping it: the
/// default rendering is `Tag[000000ADDR00]`, a type tag plus a 12-hex-digit
/// identity derived from the value's address. Override [`describe`] for
/// entities with a better notion of identity (a shape, a name, a key).
///
/// [`describe`]: Describe::describe
///
/// ```
/// use blocklog::Describe;
///
/// struct Batch {
///     rows: usize,
/// }
///
/// impl Describe for Batch {
///     fn type_tag(&self) -> &'static str {
///         "Batch"
///     }
///
///     fn describe(&self) -> String {
///         format!("{}{{rows={}}}", self.type_tag(), self.rows)
///     }
/// }
///
/// assert_eq!(Batch { rows: 3 }.describe(), "Batch{rows=3}");
/// ```
pub trait Describe {
    /// Static type tag, typically the type's own name
    fn type_tag(&self) -> &'static str;

    /// One-token description: type tag plus identity
    fn describe(&self) -> String
    where
        Self: Sized,
    {
        let identity = self as *const Self as *const () as usize as u64;
        format!("{}[{:012X}]", self.type_tag(), identity & 0xFFFF_FFFF_FFFF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget;

    impl Describe for Widget {
        fn type_tag(&self) -> &'static str {
            "Widget"
        }
    }

    #[test]
    fn test_default_describe_shape() {
        let widget = Widget;
        let description = widget.describe();

        assert!(description.starts_with("Widget["));
        assert!(description.ends_with(']'));
        let identity = &description["Widget[".len()..description.len() - 1];
        assert_eq!(identity.len(), 12);
        assert!(identity.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
