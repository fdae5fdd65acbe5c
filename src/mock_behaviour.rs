//! This module provides ways to tweak mocked remote sources, so that they can return errors on some tests
#![cfg(any(test, feature = "mock_remote"))]

use crate::error::{Error, Result};

/// This stores some behaviour tweaks, that describe how a mocked instance will behave during a given test
///
/// So that a functions fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,

    pub list_events_behaviour: (u32, u32),
    pub create_event_behaviour: (u32, u32),
    pub update_event_behaviour: (u32, u32),

    pub list_references_behaviour: (u32, u32),
    pub find_reference_behaviour: (u32, u32),
    pub search_references_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All items will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            list_events_behaviour: (0, n_fails),
            create_event_behaviour: (0, n_fails),
            update_event_behaviour: (0, n_fails),
            list_references_behaviour: (0, n_fails),
            find_reference_behaviour: (0, n_fails),
            search_references_behaviour: (0, n_fails),
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_list_events(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.list_events_behaviour, "list_events")
    }
    pub fn can_create_event(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.create_event_behaviour, "create_event")
    }
    pub fn can_update_event(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.update_event_behaviour, "update_event")
    }
    pub fn can_list_references(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.list_references_behaviour, "list_references")
    }
    pub fn can_find_reference(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.find_reference_behaviour, "find_reference")
    }
    pub fn can_search_references(&mut self) -> Result<()> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.search_references_behaviour, "search_references")
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<()> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 = value.0 - 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else {
        if remaining_failures > 0 {
            value.1 = value.1 - 1;
            log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
            Err(Error::Remote(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value)))
        } else {
            log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mock_behaviour() {
        let mut ok = MockBehaviour::new();
        for _ in 0..5 {
            assert!(ok.can_list_events().is_ok());
            assert!(ok.can_create_event().is_ok());
        }

        let mut now = MockBehaviour::fail_now(2);
        assert!(now.can_list_events().is_err());
        assert!(now.can_create_event().is_err());
        assert!(now.can_create_event().is_err());
        assert!(now.can_list_events().is_err());
        assert!(now.can_list_events().is_ok());
        assert!(now.can_list_events().is_ok());
        assert!(now.can_create_event().is_ok());
        assert!(now.can_search_references().is_err());

        let mut custom = MockBehaviour{
            list_references_behaviour: (0,1),
            update_event_behaviour: (1,3),
            ..MockBehaviour::default()
        };
        assert!(custom.can_list_references().is_err());
        assert!(custom.can_list_references().is_ok());
        assert!(custom.can_list_references().is_ok());
        assert!(custom.can_update_event().is_ok());
        assert!(custom.can_update_event().is_err());
        assert!(custom.can_update_event().is_err());
        assert!(custom.can_update_event().is_err());
        assert!(custom.can_update_event().is_ok());

        let mut suspended = MockBehaviour::fail_now(1);
        suspended.suspend();
        assert!(suspended.can_find_reference().is_ok());
        suspended.resume();
        assert!(suspended.can_find_reference().is_err());
        assert!(suspended.can_find_reference().is_ok());
    }
}
