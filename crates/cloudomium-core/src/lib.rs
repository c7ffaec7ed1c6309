//! # Cloudomium Core
//!
//! Core types and contracts for the Cloudomium serverless organizer.
//!
//! This crate provides the foundational types used throughout Cloudomium:
//!
//! - [`HttpException`] / [`ExceptionKind`] - Classified failures with a status code
//! - [`Failure`] - Closed failure type returned by every pipeline step
//! - [`Middleware`], [`Handler`], [`ErrorHandler`] - Step contracts
//! - [`Organizer`] / [`LambdaOrganizer`] - Protocol-agnostic registration state
//! - [`HttpResponse`] / [`HttpResponseShape`] - Response shape the HTTP pipeline works with

#![doc(html_root_url = "https://docs.rs/cloudomium-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod handler;
mod organizer;
mod response;

pub use error::{CloudomiumResult, ExceptionKind, Failure, HttpException};
pub use handler::{
    BoxFuture, ErrorHandler, FnErrorHandler, FnHandler, FnMiddleware, Handler, Middleware,
};
pub use organizer::{BoxedErrorHandler, BoxedMiddleware, LambdaOrganizer, Organizer};
pub use response::{HttpResponse, HttpResponseShape, NO_CONTENT};
