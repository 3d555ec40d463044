//! Reentrancy protection for contract calls.
//!
//! Every call pushes a frame; a contract that is already on the stack cannot
//! be entered again within the same transaction.

use std::collections::HashSet;

use zora_types::Address;

use crate::error::ExecutionError;
use crate::MAX_CALL_DEPTH;

/// Tracks the call stack and rejects re-entry into an active contract.
#[derive(Debug, Clone)]
pub struct ReentrancyGuard {
    stack: Vec<CallFrame>,
    /// Addresses in the call stack (for O(1) lookup)
    in_stack: HashSet<Address>,
    max_depth: usize,
}

/// A single frame in the call stack.
#[derive(Debug, Clone, PartialEq)]
pub struct CallFrame {
    pub address: Address,
    pub caller: Address,
    pub value: u128,
    /// Call depth (0 for top-level)
    pub depth: usize,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::with_max_depth(MAX_CALL_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            stack: Vec::new(),
            in_stack: HashSet::new(),
            max_depth,
        }
    }

    /// Enter a new call frame.
    ///
    /// # Errors
    /// - `CallDepthExceeded` once `max_depth` frames are active
    /// - `ReentrancyViolation` if `address` is already executing
    pub fn enter(
        &mut self,
        address: Address,
        caller: Address,
        value: u128,
    ) -> Result<usize, ExecutionError> {
        let depth = self.stack.len();

        if depth >= self.max_depth {
            return Err(ExecutionError::CallDepthExceeded { depth });
        }

        if self.in_stack.contains(&address) {
            return Err(ExecutionError::ReentrancyViolation(format!(
                "contract {} is already in the call stack",
                address
            )));
        }

        self.in_stack.insert(address);
        self.stack.push(CallFrame {
            address,
            caller,
            value,
            depth,
        });

        Ok(depth)
    }

    /// Exit the current call frame.
    pub fn exit(&mut self) -> Result<CallFrame, ExecutionError> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| ExecutionError::ReentrancyViolation("call stack is empty".to_string()))?;

        self.in_stack.remove(&frame.address);
        Ok(frame)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.in_stack.contains(address)
    }

    /// The account that started the current transaction.
    pub fn origin(&self) -> Option<Address> {
        self.stack.first().map(|f| f.caller)
    }

    pub fn reset(&mut self) {
        self.stack.clear();
        self.in_stack.clear();
    }
}

impl Default for ReentrancyGuard {
    fn default() -> Self {
        Self::new()
    }
}
