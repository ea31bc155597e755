use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::builtin;
use super::units::{earliest_unit, same_unit, UnitMatcher};
use super::CatalogError;
use crate::models::{Panel, ReferenceRange, Sex};
use crate::pipeline_config::MatchMode;

/// Interval outside which an extracted value is treated as an
/// extraction error rather than a clinical result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlausibleRange {
    pub min: f64,
    pub max: f64,
}

impl PlausibleRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Reference range, optionally split by sex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangeSpec {
    Shared(ReferenceRange),
    BySex {
        male: ReferenceRange,
        female: ReferenceRange,
    },
}

impl RangeSpec {
    /// Unspecified sex falls back to the male range.
    pub fn select(&self, sex: Option<Sex>) -> &ReferenceRange {
        match self {
            Self::Shared(range) => range,
            Self::BySex { female, .. } if sex == Some(Sex::Female) => female,
            Self::BySex { male, .. } => male,
        }
    }

    fn ranges(&self) -> Vec<&ReferenceRange> {
        match self {
            Self::Shared(range) => vec![range],
            Self::BySex { male, female } => vec![male, female],
        }
    }
}

/// Catalog entry for one canonical test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestDefinition {
    pub canonical_name: String,
    pub display_name: String,
    pub panel: Panel,
    /// Regex fragments, matched case-insensitively.
    pub name_patterns: Vec<String>,
    /// Short forms only recognized when they make up the whole line.
    #[serde(default)]
    pub abbreviations: Vec<String>,
    /// Regex fragments for lines that look like this test but are not,
    /// such as "LDL/HDL Ratio" for HDL.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    pub unit: String,
    #[serde(default)]
    pub plausible_range: Option<PlausibleRange>,
    #[serde(default)]
    pub reference_range: Option<RangeSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitAlias {
    pub unit: String,
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRule {
    pub test: String,
    pub from: String,
    pub to: String,
    pub factor: f64,
}

/// On-disk catalog shape. Omitted sections use the bundled tables.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    tests: Vec<TestDefinition>,
    units: Option<Vec<UnitAlias>>,
    conversions: Option<Vec<ConversionRule>>,
    plausible_ceiling: Option<f64>,
}

#[derive(Debug)]
struct CompiledTest {
    definition: TestDefinition,
    lenient: Regex,
    strict: Regex,
    abbreviation: Option<Regex>,
    exclude: Option<Regex>,
}

impl CompiledTest {
    fn compile(definition: TestDefinition) -> Result<Self, CatalogError> {
        let invalid =
            |e: regex::Error| CatalogError::InvalidPattern(definition.canonical_name.clone(), e.to_string());

        let alternatives = definition.name_patterns.join("|");
        let lenient = Regex::new(&format!(r"(?i)\b(?:{alternatives})\b")).map_err(invalid)?;
        let strict = Regex::new(&format!(r"(?i)^\s*(?:{alternatives})\s*:?\s*$")).map_err(invalid)?;
        let abbreviation = if definition.abbreviations.is_empty() {
            None
        } else {
            let abbrs = definition
                .abbreviations
                .iter()
                .map(|a| regex::escape(a))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(r"(?i)^\s*(?:{abbrs})\s*:?\s*$")).map_err(invalid)?)
        };

        let exclude = if definition.exclude_patterns.is_empty() {
            None
        } else {
            let excluded = definition.exclude_patterns.join("|");
            Some(Regex::new(&format!(r"(?i)\b(?:{excluded})\b")).map_err(invalid)?)
        };

        Ok(Self {
            definition,
            lenient,
            strict,
            abbreviation,
            exclude,
        })
    }

    fn matches(&self, line: &str, mode: MatchMode) -> bool {
        if self.exclude.as_ref().is_some_and(|re| re.is_match(line)) {
            return false;
        }
        let by_name = match mode {
            MatchMode::Strict => self.strict.is_match(line),
            MatchMode::Lenient => self.lenient.is_match(line),
        };
        by_name || self.abbreviation.as_ref().is_some_and(|re| re.is_match(line))
    }
}

/// Immutable, validated reference catalog. Shared across analyses via `Arc`.
#[derive(Debug)]
pub struct LabCatalog {
    tests: Vec<CompiledTest>,
    index: HashMap<String, usize>,
    units: Vec<UnitMatcher>,
    conversions: Vec<ConversionRule>,
    plausible_ceiling: f64,
}

static BUILTIN: LazyLock<Arc<LabCatalog>> = LazyLock::new(|| {
    Arc::new(
        LabCatalog::new(
            builtin::definitions(),
            builtin::unit_aliases(),
            builtin::conversions(),
            builtin::DEFAULT_PLAUSIBLE_CEILING,
        )
        .expect("bundled catalog is valid"),
    )
});

impl LabCatalog {
    /// The bundled catalog.
    pub fn builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    pub fn new(
        tests: Vec<TestDefinition>,
        units: Vec<UnitAlias>,
        conversions: Vec<ConversionRule>,
        plausible_ceiling: f64,
    ) -> Result<Self, CatalogError> {
        validate(&tests, &units, &conversions, plausible_ceiling)?;

        let mut index = HashMap::new();
        let mut compiled = Vec::with_capacity(tests.len());
        for (i, definition) in tests.into_iter().enumerate() {
            index.insert(definition.canonical_name.clone(), i);
            compiled.push(CompiledTest::compile(definition)?);
        }
        let units = units
            .iter()
            .map(UnitMatcher::compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            tests: compiled,
            index,
            units,
            conversions,
            plausible_ceiling,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(
            file.tests,
            file.units.unwrap_or_else(builtin::unit_aliases),
            file.conversions.unwrap_or_else(builtin::conversions),
            file.plausible_ceiling
                .unwrap_or(builtin::DEFAULT_PLAUSIBLE_CEILING),
        )
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Load(path.display().to_string(), e.to_string()))?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            tests = catalog.len(),
            "Loaded lab catalog"
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Definitions in table order.
    pub fn tests(&self) -> impl Iterator<Item = &TestDefinition> {
        self.tests.iter().map(|t| &t.definition)
    }

    /// First definition, in table order, whose patterns match `line`.
    pub fn match_line(&self, line: &str, mode: MatchMode) -> Option<&TestDefinition> {
        self.tests
            .iter()
            .find(|t| t.matches(line, mode))
            .map(|t| &t.definition)
    }

    pub fn definition(&self, canonical_name: &str) -> Option<&TestDefinition> {
        self.index
            .get(canonical_name)
            .map(|&i| &self.tests[i].definition)
    }

    pub fn reference_range(&self, canonical_name: &str, sex: Option<Sex>) -> Option<&ReferenceRange> {
        self.definition(canonical_name)?
            .reference_range
            .as_ref()
            .map(|spec| spec.select(sex))
    }

    pub fn plausible_range(&self, canonical_name: &str) -> Option<PlausibleRange> {
        self.definition(canonical_name)?.plausible_range
    }

    /// Tests without a specific interval accept any positive value under
    /// the catalog ceiling.
    pub fn is_plausible(&self, canonical_name: &str, value: f64) -> bool {
        match self.plausible_range(canonical_name) {
            Some(range) => range.contains(value),
            None => value > 0.0 && value < self.plausible_ceiling,
        }
    }

    /// Canonical form of the earliest unit mentioned in `line`.
    pub fn find_unit(&self, line: &str) -> Option<&str> {
        earliest_unit(&self.units, line)
    }

    /// Canonical form of the unit `text` starts with, if any.
    pub fn unit_at_start(&self, text: &str) -> Option<&str> {
        self.units
            .iter()
            .find(|m| m.leads(text))
            .map(|m| m.unit.as_str())
    }

    pub fn conversion_factor(&self, canonical_name: &str, from: &str, to: &str) -> Option<f64> {
        self.conversions
            .iter()
            .find(|r| r.test == canonical_name && same_unit(&r.from, from) && same_unit(&r.to, to))
            .map(|r| r.factor)
    }
}

fn validate(
    tests: &[TestDefinition],
    units: &[UnitAlias],
    conversions: &[ConversionRule],
    plausible_ceiling: f64,
) -> Result<(), CatalogError> {
    let fail = |msg: String| Err(CatalogError::Validation(msg));

    if tests.is_empty() {
        return fail("catalog defines no tests".into());
    }
    let mut names = HashSet::new();
    for test in tests {
        let name = &test.canonical_name;
        if name.trim().is_empty() {
            return fail("test with empty canonical name".into());
        }
        if !names.insert(name.as_str()) {
            return fail(format!("duplicate test {name}"));
        }
        if test.name_patterns.is_empty() {
            return fail(format!("{name} has no name patterns"));
        }
        if let Some(plausible) = test.plausible_range {
            if !(plausible.min < plausible.max) {
                return fail(format!("{name} plausible range is empty"));
            }
        }
        if let Some(spec) = &test.reference_range {
            if spec.ranges().iter().any(|r| !r.is_valid()) {
                return fail(format!("{name} reference range low must be below high"));
            }
        }
    }
    for alias in units {
        if alias.aliases.is_empty() {
            return fail(format!("unit {} has no aliases", alias.unit));
        }
    }
    for rule in conversions {
        if !names.contains(rule.test.as_str()) {
            return fail(format!("conversion for unknown test {}", rule.test));
        }
        if !(rule.factor > 0.0) {
            return fail(format!("conversion factor for {} must be positive", rule.test));
        }
    }
    if !(plausible_ceiling > 0.0) {
        return fail("plausible ceiling must be positive".into());
    }
    Ok(())
}
