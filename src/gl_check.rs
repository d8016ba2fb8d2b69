use crate::renderer_backends::GraphicsBackend;

pub fn error_string(code: u32) -> &'static str {
    match code {
        glow::NO_ERROR => "no error",
        glow::INVALID_ENUM => "invalid enumerant",
        glow::INVALID_VALUE => "invalid value",
        glow::INVALID_OPERATION => "invalid operation",
        glow::STACK_OVERFLOW => "stack overflow",
        glow::STACK_UNDERFLOW => "stack underflow",
        glow::OUT_OF_MEMORY => "out of memory",
        glow::INVALID_FRAMEBUFFER_OPERATION => "invalid framebuffer operation",
        _ => "unknown error",
    }
}

// A lost context keeps reporting errors forever.
const MAX_DRAINED_ERRORS: usize = 32;

/// Pops every pending GL error, oldest first.
pub fn drain_errors<B: GraphicsBackend>(backend: &mut B) -> Vec<u32> {
    let mut codes = Vec::new();
    while codes.len() < MAX_DRAINED_ERRORS {
        match backend.get_error() {
            glow::NO_ERROR => break,
            code => codes.push(code),
        }
    }
    codes
}

/// Empties the error queue and reports the oldest error it held.
pub fn take_error<B: GraphicsBackend>(backend: &mut B) -> Result<(), u32> {
    match drain_errors(backend).first() {
        Some(&code) => Err(code),
        None => Ok(()),
    }
}

/// Drains the GL error queue after `operation`, logging every error.
/// Returns how many errors were pending. Debug builds treat any error as a
/// broken contract.
pub fn check_gl<B: GraphicsBackend>(backend: &mut B, operation: &str) -> usize {
    let codes = drain_errors(backend);
    for &code in &codes {
        log::error!(
            "GL error after {}: {:#06x} = {}",
            operation,
            code,
            error_string(code)
        );
    }
    debug_assert!(codes.is_empty(), "GL error after {operation}");
    codes.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::null_backend::NullBackend;

    #[test]
    fn test_error_strings() {
        assert_eq!(error_string(glow::INVALID_VALUE), "invalid value");
        assert_eq!(error_string(glow::OUT_OF_MEMORY), "out of memory");
        assert_eq!(error_string(0xdead), "unknown error");
    }

    #[test]
    fn test_clean_queue() {
        let mut backend = NullBackend::new();
        assert_eq!(check_gl(&mut backend, "nothing"), 0);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "GL error after upload"))]
    fn test_pending_errors_are_reported() {
        let mut backend = NullBackend::new();
        backend.push_error(glow::INVALID_ENUM);
        backend.push_error(glow::INVALID_OPERATION);
        assert_eq!(check_gl(&mut backend, "upload"), 2);
        assert_eq!(backend.get_error(), glow::NO_ERROR);
    }

    #[test]
    fn test_take_error_empties_the_queue() {
        let mut backend = NullBackend::new();
        assert_eq!(take_error(&mut backend), Ok(()));

        backend.push_error(glow::OUT_OF_MEMORY);
        backend.push_error(glow::INVALID_VALUE);
        backend.push_error(glow::INVALID_ENUM);
        assert_eq!(take_error(&mut backend), Err(glow::OUT_OF_MEMORY));
        assert_eq!(backend.get_error(), glow::NO_ERROR);
    }

    #[test]
    fn test_drain_stops_on_endless_errors() {
        let mut backend = NullBackend::new();
        for _ in 0..40 {
            backend.push_error(glow::INVALID_OPERATION);
        }
        assert_eq!(drain_errors(&mut backend).len(), 32);
        assert_eq!(drain_errors(&mut backend).len(), 8);
    }
}
