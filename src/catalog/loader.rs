use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::{Catalog, CelestialBody};

/// Color used when a catalog line omits one.
const DEFAULT_COLOR: u32 = 0xFFFFFF;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Cannot open file: {0}")]
    FileNotFound(String),
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },
    #[error("Body '{name}' at line {line} is already defined")]
    DuplicateBody { line: usize, name: String },
    #[error("Body '{name}' at line {line} must have a positive radius")]
    InvalidRadius { line: usize, name: String },
    #[error("Catalog is empty")]
    EmptyCatalog,
}

fn parse_number(s: &str, what: &str, line: usize) -> Result<f32, CatalogError> {
    s.parse().map_err(|_| CatalogError::ParseError {
        line,
        message: format!("expected {}, got '{}'", what, s),
    })
}

/// Like [`parse_number`], but `NaN` and infinities are rejected too.
fn parse_finite(s: &str, what: &str, line: usize) -> Result<f32, CatalogError> {
    let value = parse_number(s, what, line)?;
    if !value.is_finite() {
        return Err(CatalogError::ParseError {
            line,
            message: format!("{} must be finite, got '{}'", what, s),
        });
    }
    Ok(value)
}

fn parse_color(s: &str, line: usize) -> Result<u32, CatalogError> {
    let hex = s.trim_start_matches("0x").trim_start_matches("0X");
    u32::from_str_radix(hex, 16).map_err(|_| CatalogError::ParseError {
        line,
        message: format!("invalid color format '{}'", s),
    })
}

/// Parse one non-empty line: `name radius distance rotation_speed [0xRRGGBB] [emissive]`
fn parse_body(fields: &[&str], line: usize) -> Result<CelestialBody, CatalogError> {
    if !(4..=6).contains(&fields.len()) {
        return Err(CatalogError::ParseError {
            line,
            message: format!("expected 4 to 6 fields, got {}", fields.len()),
        });
    }

    let name = fields[0].to_lowercase();
    let radius = parse_number(fields[1], "radius", line)?;
    let distance = parse_finite(fields[2], "distance", line)?;
    let rotation_speed = parse_finite(fields[3], "rotation speed", line)?;

    if !radius.is_finite() || radius <= 0.0 {
        return Err(CatalogError::InvalidRadius { line, name });
    }
    if distance < 0.0 {
        return Err(CatalogError::ParseError {
            line,
            message: format!("distance must not be negative, got {}", distance),
        });
    }

    let color = match fields.get(4) {
        Some(s) => parse_color(s, line)?,
        None => DEFAULT_COLOR,
    };

    let mut body = CelestialBody::new(&name, radius, distance, rotation_speed, color);
    if let Some(s) = fields.get(5) {
        body = body.with_emissive(parse_finite(s, "emissive intensity", line)?);
    }
    Ok(body)
}

/// Load a catalog override file
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|_| CatalogError::FileNotFound(path.display().to_string()))?;

    parse_catalog(&content)
}

/// Parse catalog content string (useful for testing)
pub fn parse_catalog(content: &str) -> Result<Catalog, CatalogError> {
    let mut bodies = Vec::new();
    let mut seen = HashSet::new();

    for (line_idx, line) in content.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = match line.split_once('#') {
            Some((before, _)) => before,
            None => line,
        }
        .trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        let body = parse_body(&fields, line_no)?;

        if !seen.insert(body.name.clone()) {
            return Err(CatalogError::DuplicateBody {
                line: line_no,
                name: body.name,
            });
        }
        bodies.push(body);
    }

    if bodies.is_empty() {
        return Err(CatalogError::EmptyCatalog);
    }

    Ok(Catalog::new(bodies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_simple_catalog() {
        let content = "sun 20 0 0.004 0xffd54a 0.6\nearth 10 100 0.002";
        let catalog = parse_catalog(content).unwrap();

        assert_eq!(catalog.len(), 2);
        let sun = catalog.get("sun").unwrap();
        assert_eq!(sun.emissive, Some(0.6));
        let earth = catalog.get("earth").unwrap();
        assert_eq!(earth.distance, 100.0);
        assert_eq!(earth.color, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_parse_keeps_order_and_skips_comments() {
        let content = "# inner system\n\nmars 5.3 130 0.0018\nvenus 9.5 70 0.002 # hot\n";
        let catalog = parse_catalog(content).unwrap();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["mars", "venus"]);
    }

    #[test]
    fn test_parse_duplicate_body() {
        let content = "earth 10 100 0.002\nEarth 11 110 0.002";
        let result = parse_catalog(content);

        assert!(matches!(result, Err(CatalogError::DuplicateBody { line: 2, .. })));
    }

    #[test]
    fn test_parse_invalid_radius() {
        let result = parse_catalog("earth 0 100 0.002");
        assert!(matches!(result, Err(CatalogError::InvalidRadius { line: 1, .. })));
    }

    #[test]
    fn test_parse_rejects_non_finite_fields() {
        let result = parse_catalog("sun 20 0 0.004\nrogue 5 NaN 0.002");
        assert!(matches!(result, Err(CatalogError::ParseError { line: 2, .. })));

        let result = parse_catalog("sun 20 0 0.004\ngiant inf 50 0.001");
        assert!(matches!(result, Err(CatalogError::InvalidRadius { line: 2, .. })));

        let result = parse_catalog("giant NaN 50 0.001");
        assert!(matches!(result, Err(CatalogError::InvalidRadius { line: 1, .. })));

        let result = parse_catalog("earth 10 100 -inf");
        assert!(matches!(result, Err(CatalogError::ParseError { line: 1, .. })));

        let result = parse_catalog("sun 20 0 0.004 0xffd54a inf");
        assert!(matches!(result, Err(CatalogError::ParseError { line: 1, .. })));
    }

    #[test]
    fn test_parse_bad_number() {
        let result = parse_catalog("earth ten 100 0.002");
        assert!(matches!(result, Err(CatalogError::ParseError { line: 1, .. })));
    }

    #[test]
    fn test_parse_wrong_field_count() {
        let result = parse_catalog("earth 10 100");
        assert!(matches!(result, Err(CatalogError::ParseError { .. })));
    }

    #[test]
    fn test_parse_empty_catalog() {
        let result = parse_catalog("# nothing here\n\n");
        assert!(matches!(result, Err(CatalogError::EmptyCatalog)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sun 20 0 0.004 0xffd54a 0.6").unwrap();
        writeln!(file, "earth 10 100 0.002 0x2a6bd4").unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_catalog("/definitely/not/here.catalog");
        assert!(matches!(result, Err(CatalogError::FileNotFound(_))));
    }
}
