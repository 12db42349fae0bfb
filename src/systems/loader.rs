use std::{fs::File, io::Read, path::Path};

use tracing::{debug, info};

use crate::{
    components::orbit::OrbitSampleTable,
    errors::{parse_error, Result, VizError},
};

/// Columns every data row must carry: time, x, y, z.
pub const MIN_COLUMNS: usize = 4;

pub struct DataLoader {}

impl DataLoader {
    /// Reads the orbit table at `path`. The first row is a header and is
    /// discarded.
    pub fn load_orbit_table(path: impl AsRef<Path>) -> Result<OrbitSampleTable> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| VizError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;

        let table = DataLoader::read_orbit_table(file).map_err(|e| match e {
            // read failures after open still belong to the file, not the format
            VizError::FileAccess { source, .. } => VizError::FileAccess {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        info!("loaded {} orbit samples from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn read_orbit_table<R: Read>(reader: R) -> Result<OrbitSampleTable> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut table = OrbitSampleTable::default();
        let mut row_len: Option<usize> = None;

        for result in csv_reader.records() {
            let record = result.map_err(DataLoader::csv_error)?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            // whitespace-only lines survive csv's blank line skipping as one empty field
            if record.len() == 1 && record[0].is_empty() {
                continue;
            }

            if record.len() < MIN_COLUMNS {
                return Err(parse_error!(
                    line,
                    "expected at least {} columns, found {}",
                    MIN_COLUMNS,
                    record.len()
                ));
            }
            match row_len {
                None => row_len = Some(record.len()),
                Some(expected) if expected != record.len() => {
                    return Err(parse_error!(
                        line,
                        "row has {} columns, previous rows have {}",
                        record.len(),
                        expected
                    ));
                }
                Some(_) => {}
            }

            let mut values = [0.0f64; MIN_COLUMNS];
            for (column, field) in record.iter().enumerate() {
                let value = field.parse::<f64>().map_err(|_| {
                    parse_error!(line, "invalid number '{}' in column {}", field, column)
                })?;
                if column < MIN_COLUMNS {
                    values[column] = value;
                }
            }
            table.push(values[0], [values[1], values[2], values[3]]);
        }

        if table.is_empty() {
            return Err(parse_error!(0, "no data rows"));
        }
        debug!("parsed {} rows with {:?} columns", table.len(), row_len);
        Ok(table)
    }

    fn csv_error(err: csv::Error) -> VizError {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(source) => VizError::FileAccess {
                path: Default::default(),
                source,
            },
            _ => VizError::Parse { line, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(text: &str) -> Result<OrbitSampleTable> {
        DataLoader::read_orbit_table(text.as_bytes())
    }

    #[test]
    fn reads_position_columns() {
        let table = parse("t,x,y,z\n0,7000,0,0\n1,0,7000,0\n").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.times(), &[0.0, 1.0]);
        assert_eq!(table.xs(), &[7000.0, 0.0]);
        assert_eq!(table.ys(), &[0.0, 7000.0]);
        assert_eq!(table.zs(), &[0.0, 0.0]);
    }

    #[test]
    fn ignores_extra_columns() {
        let table = parse("t,x,y,z,vx,vy,vz\n0,1,2,3,4,5,6\n10,7,8,9,1,1,1\n").unwrap();
        assert_eq!(table.xs(), &[1.0, 7.0]);
        assert_eq!(table.zs(), &[3.0, 9.0]);
        let positions: Vec<_> = table.positions().collect();
        assert_eq!(positions, vec![[1.0, 2.0, 3.0], [7.0, 8.0, 9.0]]);
    }

    #[test]
    fn tolerates_whitespace_blank_lines_and_comments() {
        let text = "t, x, y, z\n# generated\n 0 , 6800.5 , -1.5e3 , 2\n\n   \n1,1,1,1\n";
        let table = parse(text).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.xs(), &[6800.5, 1.0]);
        assert_eq!(table.ys(), &[-1500.0, 1.0]);
    }

    #[test]
    fn short_row_is_a_parse_error() {
        let err = parse("t,x,y,z\n0,1,2,3\n1,2,3\n").unwrap_err();
        match err {
            VizError::Parse { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("at least 4"), "{message}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = parse("t,x,y,z,w\n0,1,2,3,4\n1,2,3,4\n").unwrap_err();
        assert!(matches!(err, VizError::Parse { line: 3, .. }), "{err:?}");
    }

    #[test]
    fn non_numeric_field_is_a_parse_error() {
        let err = parse("t,x,y,z\n0,1,abc,3\n").unwrap_err();
        match err {
            VizError::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("'abc'"), "{message}");
                assert!(message.contains("column 2"), "{message}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn header_only_is_a_parse_error() {
        assert!(matches!(parse("t,x,y,z\n"), Err(VizError::Parse { .. })));
        assert!(matches!(parse(""), Err(VizError::Parse { .. })));
    }

    #[test]
    fn missing_file_is_a_file_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        let err = DataLoader::load_orbit_table(&path).unwrap_err();
        match err {
            VizError::FileAccess { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "time,x,y,z").unwrap();
        writeln!(file, "0,7000,0,0").unwrap();
        writeln!(file, "60,6990,370,0").unwrap();
        writeln!(file, "120,6960,740,10").unwrap();

        let table = DataLoader::load_orbit_table(file.path()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.times(), &[0.0, 60.0, 120.0]);
        assert_eq!(table.zs(), &[0.0, 0.0, 10.0]);
    }
}
