use std::collections::BTreeMap;

use restock_core::{ProductType, ReplenishmentError, ReplenishmentResult};

use crate::rules::ProductTypeRules;

/// Process-wide, read-only rule table keyed by product type.
///
/// Built once through [`ProductRuleTableBuilder`] and never mutated afterwards, so
/// it can be shared (`Arc<ProductRuleTable>`) across evaluation workers without any
/// locking.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductRuleTable {
    entries: BTreeMap<ProductType, ProductTypeRules>,
}

impl ProductRuleTable {
    pub fn builder() -> ProductRuleTableBuilder {
        ProductRuleTableBuilder::default()
    }

    /// Rules registered for `product_type`.
    pub fn lookup(&self, product_type: &ProductType) -> ReplenishmentResult<&ProductTypeRules> {
        self.entries
            .get(product_type)
            .ok_or_else(|| ReplenishmentError::unknown_product_type(product_type.clone()))
    }

    pub fn contains(&self, product_type: &ProductType) -> bool {
        self.entries.contains_key(product_type)
    }

    /// Registered product types in ascending order.
    pub fn product_types(&self) -> impl Iterator<Item = &ProductType> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProductType, &ProductTypeRules)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Initialization-time registration of product-type rules.
#[derive(Debug, Default)]
pub struct ProductRuleTableBuilder {
    entries: BTreeMap<ProductType, ProductTypeRules>,
}

impl ProductRuleTableBuilder {
    /// Register the rules of one product type.
    ///
    /// Fails on duplicate registration and on rules that do not validate. A
    /// `min_batch_size` that is not a multiple of `multiplicity` is accepted; the
    /// calculator rounds it up when applying the floor.
    pub fn register(
        mut self,
        product_type: ProductType,
        rules: ProductTypeRules,
    ) -> ReplenishmentResult<Self> {
        rules
            .validate()
            .map_err(|e| ReplenishmentError::configuration(format!("{product_type}: {e}")))?;

        if self.entries.contains_key(&product_type) {
            return Err(ReplenishmentError::configuration(format!(
                "product type `{product_type}` registered twice"
            )));
        }

        if !rules.min_batch_is_aligned() {
            tracing::warn!(
                product_type = %product_type,
                min_batch_size = rules.min_batch_size,
                multiplicity = rules.multiplicity,
                effective_min_batch = rules.effective_min_batch(),
                "min_batch_size is not a multiple of multiplicity; it will be rounded up"
            );
        }

        self.entries.insert(product_type, rules);
        Ok(self)
    }

    pub fn build(self) -> ProductRuleTable {
        ProductRuleTable {
            entries: self.entries,
        }
    }
}
