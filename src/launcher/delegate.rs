//! Hand-over to the resolved binary.

use log::debug;
use std::ffi::OsString;
use std::path::Path;

use crate::error::LaunchError;
use crate::runtime::Runtime;

/// Exit code used when the child ends without one (killed by a signal).
pub const ABNORMAL_EXIT_CODE: i32 = 1;

/// Run `binary` once with `args` exactly as given and the parent's standard
/// streams, and return the exit code the launcher should end with.
pub fn delegate<R: Runtime>(
    runtime: &R,
    binary: &Path,
    args: &[OsString],
) -> Result<i32, LaunchError> {
    debug!("Delegating to {:?} with {} argument(s)", binary, args.len());

    match runtime.run_inherited(binary.as_os_str(), args) {
        Ok(Some(code)) => Ok(code),
        Ok(None) => {
            debug!("{:?} terminated without an exit code", binary);
            Ok(ABNORMAL_EXIT_CODE)
        }
        Err(source) => Err(LaunchError::SpawnFailure {
            path: binary.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::ffi::OsStr;
    use std::io;
    use std::path::PathBuf;

    fn binary() -> PathBuf {
        PathBuf::from("/pkg/bin/tool")
    }

    #[test]
    fn test_child_exit_code_is_returned() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_run_inherited()
            .times(1)
            .returning(|_, _| Ok(Some(7)));

        assert_eq!(delegate(&runtime, &binary(), &[]).unwrap(), 7);
    }

    #[test]
    fn test_success_is_zero() {
        let mut runtime = MockRuntime::new();
        runtime.expect_run_inherited().returning(|_, _| Ok(Some(0)));

        assert_eq!(delegate(&runtime, &binary(), &[]).unwrap(), 0);
    }

    #[test]
    fn test_abnormal_termination_is_never_zero() {
        let mut runtime = MockRuntime::new();
        runtime.expect_run_inherited().returning(|_, _| Ok(None));

        let code = delegate(&runtime, &binary(), &[]).unwrap();
        assert_eq!(code, ABNORMAL_EXIT_CODE);
        assert_ne!(code, 0);
    }

    #[test]
    fn test_arguments_are_forwarded_verbatim() {
        let args: Vec<OsString> = vec![
            "--flag".into(),
            "two words".into(),
            "$(rm -rf /)".into(),
            "".into(),
            "a\"b'c".into(),
        ];
        let expected = args.clone();

        let mut runtime = MockRuntime::new();
        runtime
            .expect_run_inherited()
            .withf(move |program, forwarded| {
                program == OsStr::new("/pkg/bin/tool") && forwarded == expected.as_slice()
            })
            .times(1)
            .returning(|_, _| Ok(Some(0)));

        delegate(&runtime, &binary(), &args).unwrap();
    }

    #[test]
    fn test_spawn_error_is_distinct() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_run_inherited()
            .with(eq(OsStr::new("/pkg/bin/tool")), eq(Vec::<OsString>::new()))
            .returning(|_, _| Err(io::Error::from(io::ErrorKind::PermissionDenied)));

        match delegate(&runtime, &binary(), &[]) {
            Err(LaunchError::SpawnFailure { path, source }) => {
                assert_eq!(path, binary());
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected SpawnFailure, got {:?}", other),
        }
    }
}
