/*++

Licensed under the Apache-2.0 license.

File Name:

    wait.rs

Abstract:

    File contains common functions to implement bounded wait routines.

--*/

use plm_error::{PlmError, PlmResult};

/// Calls `f` until it yields a value or `max_polls` attempts have been
/// made.
///
/// Returns `None` when the bound is exhausted.
pub fn poll<T, F>(max_polls: u32, mut f: F) -> Option<T>
where
    F: FnMut() -> Option<T>,
{
    for _ in 0..max_polls {
        if let Some(val) = f() {
            return Some(val);
        }
    }
    None
}

/// Spins until `predicate` holds, failing with `err` after `max_polls`
/// unsuccessful checks.
pub fn until<F>(max_polls: u32, err: PlmError, mut predicate: F) -> PlmResult<()>
where
    F: FnMut() -> bool,
{
    poll(max_polls, || predicate().then_some(())).ok_or(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_returns_first_value() {
        let mut calls = 0;
        let result = poll(10, || {
            calls += 1;
            (calls == 3).then_some(calls)
        });
        assert_eq!(result, Some(3));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_poll_bound_exhausted() {
        let mut calls = 0;
        let result: Option<()> = poll(5, || {
            calls += 1;
            None
        });
        assert_eq!(result, None);
        assert_eq!(calls, 5);
    }

    #[test]
    fn test_until_zero_bound() {
        assert_eq!(
            until(0, PlmError::DRIVER_PUF_DONE_WAIT_TIMEOUT, || true),
            Err(PlmError::DRIVER_PUF_DONE_WAIT_TIMEOUT)
        );
    }

    #[test]
    fn test_until_success() {
        let mut calls = 0;
        assert_eq!(
            until(4, PlmError::DRIVER_PUF_DONE_WAIT_TIMEOUT, || {
                calls += 1;
                calls == 4
            }),
            Ok(())
        );
    }
}
