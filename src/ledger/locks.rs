//! Per-employee mutual exclusion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// One lock per employee id.
///
/// Ledger mutations for the same employee run one at a time; different
/// employees never wait on each other beyond the brief map lookup. An
/// employee's entry lives only while some caller holds or awaits its lock.
#[derive(Debug, Default)]
pub struct EmployeeLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl EmployeeLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, employee_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(employee_id.to_string()).or_default())
    }

    /// Drops the employee's entry once the map holds the only reference.
    fn release(&self, employee_id: &str) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(employee_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(employee_id);
        }
    }

    /// Runs `f` while holding the lock of `employee_id`.
    pub fn with_lock<T>(&self, employee_id: &str, f: impl FnOnce() -> T) -> T {
        let result = {
            let lock = self.lock_for(employee_id);
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };
        self.release(employee_id);
        result
    }

    /// Number of employees with a live lock entry.
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true when no employee has a live lock entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_same_employee_shares_a_lock() {
        let locks = EmployeeLocks::new();
        let a = locks.lock_for("emp_001");
        let b = locks.lock_for("emp_001");
        let c = locks.lock_for("emp_002");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_entries_are_released_after_use() {
        let locks = EmployeeLocks::new();
        for n in 0..50 {
            locks.with_lock(&format!("emp_{:03}", n), || ());
        }
        assert!(locks.is_empty());
    }

    #[test]
    fn test_entry_in_use_is_kept() {
        let locks = EmployeeLocks::new();
        let held = locks.lock_for("emp_001");
        locks.with_lock("emp_001", || ());
        assert_eq!(locks.len(), 1);
        assert!(Arc::ptr_eq(&held, &locks.lock_for("emp_001")));

        drop(held);
        locks.with_lock("emp_001", || ());
        assert!(locks.is_empty());
    }

    #[test]
    fn test_with_lock_serializes_read_modify_write() {
        let locks = Arc::new(EmployeeLocks::new());
        let counter = Arc::new(Mutex::new(0u32));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = Arc::clone(&locks);
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..100 {
                        locks.with_lock("emp_001", || {
                            let current = *counter.lock().unwrap();
                            thread::yield_now();
                            *counter.lock().unwrap() = current + 1;
                        });
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(*counter.lock().unwrap(), 800);
        assert!(locks.is_empty());
    }
}
