#[cfg(test)]
mod tests {
    use crate::core::error::DialerError;
    use crate::io::loaders::{DialerLoader, InputFile, InputSet};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CALL_LOG: &str = "\
Start time,Account,Call status,Answer duration,Hold duration,Queue duration,Customer number
2024-03-04 09:10:00,jane.doe@co.com,Answered,30,0,0,111
2024-03-04 09:10:00,jane.doe@co.com,Answered,30,0,0,222
";

    const ROSTER: &str = "\
Dialer Name,Email,Full Name,Pool,TL
jane doe,J1,Jane Doe,A,X
";

    /// Helper to create a temp file with the given suffix
    fn create_temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_input_set() {
        let inputs = InputSet::new(
            vec![
                InputFile::new("stringee_1.csv", CALL_LOG),
                InputFile::new("stringee_2.csv", CALL_LOG),
            ],
            InputFile::new("team.csv", ROSTER),
        );
        let loaded = DialerLoader::load(&inputs).unwrap();

        assert_eq!(loaded.calls.len(), 4);
        assert_eq!(loaded.calls[2].source, "stringee_2.csv");
        assert_eq!(loaded.roster.len(), 1);
        assert_eq!(loaded.inputs.len(), 3);
        assert_eq!(loaded.inputs[2].name, "team.csv");
        assert_eq!(loaded.inputs[2].rows, 1);
    }

    #[test]
    fn test_load_from_paths() {
        let calls = create_temp_file(".csv", CALL_LOG);
        let roster = create_temp_file(".csv", ROSTER);

        let loaded = DialerLoader::load_from_paths(&[calls.path()], roster.path()).unwrap();
        assert_eq!(loaded.calls.len(), 2);
        assert_eq!(loaded.roster[0].agent_key, "J1");
    }

    #[test]
    fn test_missing_file_has_context() {
        let roster = create_temp_file(".csv", ROSTER);
        let err = DialerLoader::load_from_paths(&["/nonexistent/calls.csv"], roster.path())
            .unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/calls.csv"));
    }

    #[test]
    fn test_unsupported_extension() {
        let inputs = InputSet::new(
            vec![InputFile::new("calls.json", "{}")],
            InputFile::new("team.csv", ROSTER),
        );
        let err = DialerLoader::load(&inputs).unwrap_err();
        assert!(matches!(err, DialerError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_missing_column_in_roster_fails_whole_load() {
        let inputs = InputSet::new(
            vec![InputFile::new("stringee_1.csv", CALL_LOG)],
            InputFile::new("team.csv", "Dialer Name,Email\njane,J1\n"),
        );
        let err = DialerLoader::load(&inputs).unwrap_err();
        match err {
            DialerError::MissingRequiredColumn { input, columns } => {
                assert_eq!(input, "team.csv");
                assert_eq!(columns, "Full Name, Pool, TL");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fingerprint_covers_names_and_content() {
        let a = InputSet::new(
            vec![InputFile::new("a.csv", CALL_LOG)],
            InputFile::new("team.csv", ROSTER),
        );
        let renamed = InputSet::new(
            vec![InputFile::new("b.csv", CALL_LOG)],
            InputFile::new("roster.csv", ROSTER),
        );
        let changed = InputSet::new(
            vec![InputFile::new("a.csv", CALL_LOG)],
            InputFile::new("team.csv", "Dialer Name,Email,Full Name,Pool,TL\n"),
        );

        let same = InputSet::new(
            vec![InputFile::new("a.csv", CALL_LOG)],
            InputFile::new("team.csv", ROSTER),
        );

        assert_eq!(a.fingerprint(), same.fingerprint());
        assert_ne!(a.fingerprint(), renamed.fingerprint());
        assert_ne!(a.fingerprint(), changed.fingerprint());
    }
}
