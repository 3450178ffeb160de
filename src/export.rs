//! Tabular export of mined rules

use crate::error::PipelineResult;
use crate::ingest::Catalog;
use crate::mining::AssociationRule;
use crate::types::ProductId;
use std::io::Write;

/// Column headers of [`write_rules_csv`]
pub const RULE_COLUMNS: [&str; 7] = [
    "antecedent",
    "consequent",
    "antecedent_name",
    "consequent_name",
    "confidence",
    "lift",
    "support",
];

/// Ids joined with `;`
pub fn join_ids(ids: &[ProductId]) -> String {
    ids.iter().map(ProductId::to_string).collect::<Vec<_>>().join(";")
}

/// Catalog names joined with `;`; unmatched ids leave an empty slot
pub fn join_names(ids: &[ProductId], catalog: &Catalog) -> String {
    ids.iter()
        .map(|id| catalog.name(*id).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(";")
}

/// One display row per rule, aligned with [`RULE_COLUMNS`]
pub fn rule_row(rule: &AssociationRule, catalog: &Catalog) -> [String; 7] {
    [
        join_ids(&rule.antecedent),
        join_ids(&rule.consequent),
        join_names(&rule.antecedent, catalog),
        join_names(&rule.consequent, catalog),
        format!("{:.6}", rule.confidence),
        format!("{:.6}", rule.lift),
        format!("{:.6}", rule.support),
    ]
}

/// Write rules as CSV with a header row
pub fn write_rules_csv<W: Write>(writer: W, rules: &[AssociationRule], catalog: &Catalog) -> PipelineResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(RULE_COLUMNS)?;
    for rule in rules {
        csv.write_record(rule_row(rule, catalog))?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_csv() {
        let rules = vec![AssociationRule {
            antecedent: vec![ProductId(1), ProductId(5)],
            consequent: vec![ProductId(2)],
            confidence: 0.5,
            lift: 2.0,
            support: 0.25,
        }];
        let catalog: Catalog = vec![(1u64, "Milk, 2%"), (2u64, "Bread")].into_iter().collect();

        let mut out = Vec::new();
        write_rules_csv(&mut out, &rules, &catalog).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "antecedent,consequent,antecedent_name,consequent_name,confidence,lift,support");
        assert_eq!(lines[1], "1;5,2,\"Milk, 2%;\",Bread,0.500000,2.000000,0.250000");
    }
}
