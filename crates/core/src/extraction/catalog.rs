//! Known budget programs, used to recognise the program a sheet belongs to.

use std::path::Path;

use log::warn;

const BUILTIN_PROGRAMS: [(&str, &str); 11] = [
    ("002", "Salud materno neonatal"),
    ("0016", "TBC-VIH/SIDA"),
    ("0017", "Enfermedades metaxenicas y zoonosis"),
    ("0018", "Enfermedades no transmisibles"),
    ("0024", "Prevención y control del cáncer"),
    (
        "0068",
        "Reducción de vulnerabilidad y atención de emergencias por desastres",
    ),
    (
        "0104",
        "Reducción de la mortalidad por emergencias y urgencias medica",
    ),
    (
        "0129",
        "Prevención y manejo de condiciones secundarias de salud en personas con discapacidad",
    ),
    ("0131", "Control y prevención en salud mental"),
    (
        "1001",
        "Productos Específicos para desarrollo infantil temprano (RS 023-2019-EF)",
    ),
    (
        "1002",
        "Productos Específicos para la reducción de la violencia contra la mujer (RS 024-2019-EF)",
    ),
];

/// Ordered list of `(code, name)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct PprCatalog {
    entries: Vec<(String, String)>,
}

impl Default for PprCatalog {
    fn default() -> Self {
        PprCatalog::builtin()
    }
}

impl PprCatalog {
    pub fn builtin() -> Self {
        PprCatalog {
            entries: BUILTIN_PROGRAMS
                .iter()
                .map(|(c, n)| (c.to_string(), n.to_string()))
                .collect(),
        }
    }

    /// Parses `code,name` lines after a header line. Returns `None` when no
    /// line yields an entry.
    pub fn parse(content: &str) -> Option<Self> {
        let entries: Vec<(String, String)> = content
            .lines()
            .skip(1)
            .filter_map(|line| {
                let (code, name) = line.trim().split_once(',')?;
                let (code, name) = (code.trim(), name.trim());
                (!code.is_empty() && !name.is_empty())
                    .then(|| (code.to_string(), name.to_string()))
            })
            .collect();
        (!entries.is_empty()).then_some(PprCatalog { entries })
    }

    /// Reads a catalog file, falling back to the built-in list when the file
    /// is missing, unreadable or empty.
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return PprCatalog::builtin();
        };
        match std::fs::read_to_string(path) {
            Ok(content) => PprCatalog::parse(&content).unwrap_or_else(|| {
                warn!("Catalog {} has no entries, using built-in list", path.display());
                PprCatalog::builtin()
            }),
            Err(e) => {
                warn!("Could not read catalog {}: {}", path.display(), e);
                PprCatalog::builtin()
            }
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(c, n)| (c.as_str(), n.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_header_and_blank_lines() {
        let catalog = PprCatalog::parse("codigo,nombre\n0001,Articulado, nutricional\n\n").unwrap();
        let entries: Vec<_> = catalog.entries().collect();
        assert_eq!(entries, vec![("0001", "Articulado, nutricional")]);
        assert!(PprCatalog::parse("codigo,nombre\n").is_none());
    }

    #[test]
    fn missing_file_falls_back_to_builtin() {
        let catalog = PprCatalog::load_or_builtin(Some(Path::new("/nonexistent/ppr.txt")));
        assert_eq!(catalog.entries().count(), 11);
    }
}
