//! Subnet counters for link allocation.
//!
//! One counter per AS for internal links and one shared counter for every
//! eBGP link. Counters start from the configured value at the beginning of a
//! run and are never recovered from the store; values whose subnet is
//! already taken are skipped instead.

use super::identity::MAX_SUBNET_INDEX;
use crate::error::TopologyError;
use log::debug;
use std::collections::HashMap;
use std::fmt;

/// Address space a counter hands out subnets from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterScope {
    /// Internal links of one AS
    As(u32),
    /// All inter-AS links
    Ebgp,
}

impl fmt::Display for CounterScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterScope::As(as_number) => write!(f, "AS {} link space", as_number),
            CounterScope::Ebgp => write!(f, "eBGP link space"),
        }
    }
}

/// Monotonic subnet counters owned by one generation run
#[derive(Debug)]
pub struct SubnetCounters {
    start: u32,
    counters: HashMap<CounterScope, u32>,
}

impl SubnetCounters {
    pub fn new(start: u32) -> Self {
        SubnetCounters {
            start,
            counters: HashMap::new(),
        }
    }

    /// Value the next allocation in `scope` will try first
    pub fn peek(&self, scope: CounterScope) -> u32 {
        self.counters.get(&scope).copied().unwrap_or(self.start)
    }

    /// Take the next value in `scope` for which `in_use` returns false.
    ///
    /// Every value inspected, taken or skipped, advances the counter.
    pub fn allocate<F>(&mut self, scope: CounterScope, mut in_use: F) -> Result<u32, TopologyError>
    where
        F: FnMut(u32) -> bool,
    {
        let counter = self.counters.entry(scope).or_insert(self.start);
        loop {
            if *counter > MAX_SUBNET_INDEX {
                return Err(TopologyError::SubnetExhausted {
                    scope: scope.to_string(),
                });
            }
            let value = *counter;
            *counter += 1;
            if in_use(value) {
                debug!("Subnet {} in {} already in use, skipping", value, scope);
                continue;
            }
            return Ok(value);
        }
    }
}
