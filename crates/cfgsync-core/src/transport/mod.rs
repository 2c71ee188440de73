//! RPC transport boundary.
//!
//! The engine only needs "call this named operation with these arguments and
//! give me either a response or a fault with its message verbatim". The wire
//! format is the transport's business.

mod envelope;
mod http;

pub use envelope::parse_response;
pub use http::HttpTransport;

use serde_json::Value;

use crate::fault::RemoteFault;

/// A named-operation RPC transport.
pub trait Transport {
    /// Issue one call. Must not retry internally.
    fn call(&mut self, operation: &str, arguments: &[Value]) -> Result<Value, RemoteFault>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn call(&mut self, operation: &str, arguments: &[Value]) -> Result<Value, RemoteFault> {
        (**self).call(operation, arguments)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn call(&mut self, operation: &str, arguments: &[Value]) -> Result<Value, RemoteFault> {
        (**self).call(operation, arguments)
    }
}
