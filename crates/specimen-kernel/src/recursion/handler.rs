//! Recursion handling policies

use crate::builder::BuildResult;
use crate::error::ResolutionError;
use crate::request::Request;
use crate::value::{Outcome, Value};
use std::fmt::Debug;

/// Decides what a detected cycle resolves to
pub trait RecursionHandler: Send + Sync + Debug {
    /// Handle a repeated `request`
    ///
    /// `stack` holds the requests in flight under the detecting guard,
    /// outermost first; the repeated request is not yet pushed.
    ///
    /// # Errors
    /// Returns `ResolutionError` when the cycle is to fail the resolution.
    fn handle(&self, request: &Request, stack: &[Request]) -> BuildResult;
}

/// Fails every cycle with [`ResolutionError::RecursiveRequest`]
///
/// The strict default: infinite graphs fail fast instead of overflowing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThrowingRecursionHandler;

impl RecursionHandler for ThrowingRecursionHandler {
    fn handle(&self, request: &Request, stack: &[Request]) -> BuildResult {
        let mut path = stack.to_vec();
        path.push(request.clone());
        Err(ResolutionError::RecursiveRequest {
            request: request.clone(),
            stack: path,
        })
    }
}

/// Resolves the repeated occurrence to [`Value::Null`]
///
/// Lets graphs with optional back-references terminate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRecursionHandler;

impl RecursionHandler for NullRecursionHandler {
    fn handle(&self, _request: &Request, _stack: &[Request]) -> BuildResult {
        Ok(Outcome::Created(Value::Null))
    }
}

/// Handler backed by a closure
pub struct FnRecursionHandler<F>(pub F);

impl<F> Debug for FnRecursionHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnRecursionHandler")
    }
}

impl<F> RecursionHandler for FnRecursionHandler<F>
where
    F: Fn(&Request, &[Request]) -> BuildResult + Send + Sync,
{
    fn handle(&self, request: &Request, stack: &[Request]) -> BuildResult {
        (self.0)(request, stack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throwing_reports_full_cycle() {
        let a = Request::type_named("A");
        let b = Request::type_named("B");
        let err = ThrowingRecursionHandler
            .handle(&a, &[a.clone(), b.clone()])
            .unwrap_err();

        match err {
            ResolutionError::RecursiveRequest { request, stack } => {
                assert_eq!(request, a);
                assert_eq!(stack, vec![a.clone(), b, a]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn null_substitutes_null() {
        let a = Request::type_named("A");
        let outcome = NullRecursionHandler.handle(&a, &[a.clone()]).unwrap();
        assert_eq!(outcome, Outcome::Created(Value::Null));
    }

    #[test]
    fn closure_handler_sees_stack() {
        let handler = FnRecursionHandler(|_: &Request, stack: &[Request]| -> BuildResult {
            Ok(Outcome::created(i64::try_from(stack.len()).unwrap_or(-1)))
        });
        let a = Request::type_named("A");
        let outcome = handler.handle(&a, &[a.clone(), a.clone()]).unwrap();
        assert_eq!(outcome, Outcome::Created(Value::Int(2)));
    }
}
