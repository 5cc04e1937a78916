//! `define_port_error!`: a `thiserror` enum for a driven port, plus a
//! snake_case constructor per variant taking `impl Into<T>` for every field.
//!
//! ```ignore
//! define_port_error! {
//!     pub enum BookPersistenceError {
//!         Query { message: String } => "book repository query failed: {message}",
//!     }
//! }
//! let err = BookPersistenceError::query("timeout");
//! ```

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$doc:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$doc])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        ::paste::paste! {
            impl $name {
                $(
                    pub fn [<$variant:snake>]($( $($field: impl Into<$ty>),* )?) -> Self {
                        Self::$variant $( { $($field: $field.into()),* } )?
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    define_port_error! {
        pub enum ShelfPortError {
            Offline => "shelf store offline",
            Missing { isbn: String } => "no shelf entry for {isbn}",
            Overfull { isbn: String, count: u32 } => "shelf for {isbn} holds {count} copies",
        }
    }

    #[rstest]
    fn unit_variant_gets_nullary_constructor() {
        assert_eq!(ShelfPortError::offline(), ShelfPortError::Offline);
        assert_eq!(ShelfPortError::offline().to_string(), "shelf store offline");
    }

    #[rstest]
    fn string_fields_accept_str() {
        let err = ShelfPortError::missing("111");
        assert_eq!(err.to_string(), "no shelf entry for 111");
    }

    #[rstest]
    fn mixed_fields_keep_their_types() {
        let err = ShelfPortError::overfull("111", 3_u32);
        assert_eq!(
            err,
            ShelfPortError::Overfull {
                isbn: "111".to_owned(),
                count: 3
            }
        );
        assert_eq!(err.to_string(), "shelf for 111 holds 3 copies");
    }
}
