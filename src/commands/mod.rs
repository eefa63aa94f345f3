//! Commands Module
//!
//! One submodule per data-structure family. Each family provides:
//! - a keyword catalog (`BF.*`, `CF.*`, `CMS.*`, `TOPK.*`)
//! - option structs and the info record
//! - pure builder functions returning [`Request`](crate::Request)s
//! - a blocking and an async extension trait, generated by
//!   `command_traits!` from one table, blanket-implemented for every
//!   connection
//!
//! ```text
//! bloom::add("f", "x")           Request<bool>       (descriptor)
//! conn.bf_add("f", "x")          BloomCommands       (blocking)
//! conn.bf_add("f", "x").await    AsyncBloomCommands  (async)
//! ```

/// Generate a blocking and an async extension trait from one table of
/// `fn method(args) -> Output = builder;` entries
macro_rules! command_traits {
    (
        $(#[$sync_meta:meta])*
        sync $sync_trait:ident;
        $(#[$async_meta:meta])*
        async $async_trait:ident;
        $(
            $(#[$fn_meta:meta])*
            fn $method:ident($($arg:ident: $ty:ty),* $(,)?) -> $ret:ty = $builder:path;
        )*
    ) => {
        $(#[$sync_meta])*
        pub trait $sync_trait: $crate::connection::Connection {
            $(
                $(#[$fn_meta])*
                fn $method(&mut self, $($arg: $ty),*) -> $crate::error::Result<$ret> {
                    $builder($($arg),*).query(self)
                }
            )*
        }

        impl<C: $crate::connection::Connection + ?Sized> $sync_trait for C {}

        $(#[$async_meta])*
        #[async_trait::async_trait]
        pub trait $async_trait: $crate::connection::AsyncConnection {
            $(
                $(#[$fn_meta])*
                async fn $method(&mut self, $($arg: $ty),*) -> $crate::error::Result<$ret> {
                    $builder($($arg),*).query_async(self).await
                }
            )*
        }

        impl<C: $crate::connection::AsyncConnection + ?Sized> $async_trait for C {}
    };
}

pub mod bloom;
pub mod cuckoo;
pub mod count_min;
pub mod top_k;

mod chunks;

pub use chunks::ScanChunk;
