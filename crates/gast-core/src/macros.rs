/// Declare an AST struct with the derives every node of the model carries.
#[macro_export]
macro_rules! common_struct {
    ($(#[$meta:meta])* $vis:vis struct $name:ident { $($body:tt)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        $vis struct $name { $($body)* }
    };
    ($(#[$meta:meta])* $vis:vis struct $name:ident ( $($body:tt)* );) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        $vis struct $name ( $($body)* );
    };
}

/// Declare an AST enum with the derives every node of the model carries.
#[macro_export]
macro_rules! common_enum {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($body:tt)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        $vis enum $name { $($body)* }
    };
}

/// Declare a fieldless tag enum (operators, keywords, escape-hatch tags).
#[macro_export]
macro_rules! common_tag {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($body:tt)* }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize,
        )]
        $vis enum $name { $($body)* }
    };
}

/// Macro to return early with an error
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::error::Error::Generic(format!($($arg)*)))
    };
}
