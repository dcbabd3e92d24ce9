//! HTTP plumbing: transport, interceptors and the request pipeline.

pub mod interceptor;
pub mod request;
pub mod transport;

pub use interceptor::{HttpInterceptor, HttpRequestContext, LoggingInterceptor, QueueOperation};
pub use request::{HttpExecutionConfig, execute_request};
pub use transport::{
    HttpMethod, HttpTransport, HttpTransportRequest, HttpTransportResponse, ReqwestTransport,
};
