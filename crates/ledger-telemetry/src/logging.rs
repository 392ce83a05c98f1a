//! Logging macros with the standard contract fields.

/// Log an invocation-scoped event with `contract` and `tx_id` fields.
#[macro_export]
macro_rules! log_tx_event {
    ($level:ident, $contract:expr, $tx_id:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            contract = %$contract,
            tx_id = %$tx_id,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a key-scoped store event.
#[macro_export]
macro_rules! log_key_event {
    ($level:ident, $tx_id:expr, $key:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            tx_id = %$tx_id,
            key = ?$key,
            $($($field)*,)?
            $msg
        )
    };
}
