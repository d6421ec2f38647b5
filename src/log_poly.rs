// Stand-ins for the log/defmt macros when neither logging backend is enabled.
// Arguments are still type checked, but nothing is emitted.

macro_rules! trace {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

