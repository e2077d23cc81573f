use crate::model::Product;
use shared::errors::ServiceError;

/// Path value meaning "do not filter on this column".
pub const UNSET_SENTINEL: &str = "0";

/// An identifier parameter is well formed when it is present, non-empty and
/// made only of ASCII digits that fit an `i32`. Signs are rejected.
pub fn check_valid_id(raw: Option<&str>) -> bool {
    raw.is_some_and(|s| {
        !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) && s.parse::<i32>().is_ok()
    })
}

/// Parses a path identifier, naming the offending parameter on failure.
pub fn parse_id(field: &str, raw: &str) -> Result<i32, ServiceError> {
    let invalid = || {
        ServiceError::Validation(vec![format!(
            "{field} must be a non-negative integer, got '{raw}'"
        )])
    };

    if !check_valid_id(Some(raw)) {
        return Err(invalid());
    }

    raw.parse::<i32>().map_err(|_| invalid())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterId {
    #[default]
    Unset,
    Id(i32),
}

impl FilterId {
    /// `UNSET_SENTINEL` (or any zero) is `Unset`, other valid ids are kept.
    pub fn parse(field: &str, raw: &str) -> Result<Self, ServiceError> {
        if raw == UNSET_SENTINEL {
            return Ok(FilterId::Unset);
        }
        parse_id(field, raw).map(Self::from_raw)
    }

    pub fn from_raw(id: i32) -> Self {
        if id == 0 { FilterId::Unset } else { FilterId::Id(id) }
    }

    /// Bind value for the `($n::INT IS NULL OR column = $n)` predicate.
    pub fn as_bind(self) -> Option<i32> {
        match self {
            FilterId::Unset => None,
            FilterId::Id(id) => Some(id),
        }
    }

    fn admits(self, value: Option<i32>) -> bool {
        match self {
            FilterId::Unset => true,
            FilterId::Id(id) => value == Some(id),
        }
    }
}

/// Brand, type and material criteria combined with AND.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProductFilter {
    pub brand: FilterId,
    pub kind: FilterId,
    pub material: FilterId,
}

impl ProductFilter {
    pub fn new(brand: FilterId, kind: FilterId, material: FilterId) -> Self {
        Self {
            brand,
            kind,
            material,
        }
    }

    /// Validates all three path values, reporting every malformed one.
    pub fn parse(brand: &str, kind: &str, material: &str) -> Result<Self, ServiceError> {
        let mut errors = Vec::new();
        let mut resolve = |field: &str, raw: &str| match FilterId::parse(field, raw) {
            Ok(id) => id,
            Err(ServiceError::Validation(mut msgs)) => {
                errors.append(&mut msgs);
                FilterId::Unset
            }
            Err(_) => FilterId::Unset,
        };

        let filter = Self {
            brand: resolve("brand_id", brand),
            kind: resolve("type_id", kind),
            material: resolve("material_id", material),
        };

        if errors.is_empty() {
            Ok(filter)
        } else {
            Err(ServiceError::Validation(errors))
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        *self == Self::default()
    }

    /// Same predicate the repository pushes down to SQL.
    pub fn matches(&self, product: &Product) -> bool {
        self.brand.admits(Some(product.brand_id))
            && self.kind.admits(Some(product.type_id))
            && self.material.admits(product.material_id)
    }
}
