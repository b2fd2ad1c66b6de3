//! Process-wide interpreter lock.

use parking_lot::{Mutex, MutexGuard, const_mutex};

static INTERPRETER_LOCK: Mutex<()> = const_mutex(());

/// Proof that the caller holds the interpreter lock.
///
/// Only one guard exists in the process at any time. The lock is released
/// when the guard is dropped, on every path out of the scope that holds it.
pub struct InterpreterGuard {
    _lock: MutexGuard<'static, ()>,
}

/// Acquires the interpreter lock, blocking until it is free.
///
/// The lock is not reentrant; acquiring it twice on one thread deadlocks.
pub fn acquire() -> InterpreterGuard {
    InterpreterGuard {
        _lock: INTERPRETER_LOCK.lock(),
    }
}

/// Acquires the interpreter lock if it is free.
pub fn try_acquire() -> Option<InterpreterGuard> {
    INTERPRETER_LOCK
        .try_lock()
        .map(|lock| InterpreterGuard { _lock: lock })
}
