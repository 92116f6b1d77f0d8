use super::types::{Column, FilterWhereInfo};

pub struct FilterWhere;

impl FilterWhere {
    /// Render conditions as `"col" = $n AND ...`, numbering placeholders after
    /// `starting_param_index`. Returns an empty clause when there is nothing to match.
    pub fn generate<C: Column>(
        conditions: &[FilterWhereInfo<C>],
        starting_param_index: usize,
    ) -> (String, Vec<String>) {
        let mut params = Vec::with_capacity(conditions.len());
        let mut parts = Vec::with_capacity(conditions.len());

        for condition in conditions {
            params.push(condition.value.clone());
            parts.push(format!(
                "\"{}\" = ${}",
                condition.column.column(),
                starting_param_index + params.len()
            ));
        }

        (parts.join(" AND "), params)
    }
}
