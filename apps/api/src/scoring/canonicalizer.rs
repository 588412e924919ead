use std::collections::HashMap;

use crate::scoring::jd_config::AliasMap;

/// Maps raw skill tokens to canonical names using one configuration's alias table.
#[derive(Debug, Clone, Default)]
pub struct Canonicalizer {
    alias_to_canon: HashMap<String, String>,
}

impl Canonicalizer {
    pub fn new(aliases: &AliasMap) -> Self {
        let mut alias_to_canon = HashMap::new();
        for (canon, forms) in aliases {
            for form in forms {
                alias_to_canon.insert(form.to_lowercase(), canon.to_lowercase());
            }
        }
        // Identity entries go last so a canonical term always maps to itself.
        for canon in aliases.keys() {
            let canon = canon.to_lowercase();
            alias_to_canon.insert(canon.clone(), canon);
        }
        Self { alias_to_canon }
    }

    /// Trimmed, lowercased canonical form. Unknown tokens come back normalized
    /// but otherwise unchanged.
    pub fn canon(&self, token: &str) -> String {
        let normalized = token.trim().to_lowercase();
        match self.alias_to_canon.get(&normalized) {
            Some(canon) => canon.clone(),
            None => normalized,
        }
    }
}
