//! Gene Symbol Mapper
//!
//! Maps protein/gene aliases to canonical HGNC symbols so that edges reported
//! by different services under different names compare equal.
//!
//! The table is curated for the Parkinson's disease target set (dopaminergic
//! pathway, PARK loci, dopamine receptors, catabolic enzymes). Identifiers
//! outside the table normalize to their trimmed upper-case form.

/// Canonical symbol with its known aliases
struct GeneEntry {
    symbol: &'static str,
    aliases: &'static [&'static str],
}

const GENES: &[GeneEntry] = &[
    GeneEntry { symbol: "TH", aliases: &["TYROSINE HYDROXYLASE"] },
    GeneEntry { symbol: "SLC6A3", aliases: &["DAT", "DAT1"] },
    GeneEntry { symbol: "SLC18A2", aliases: &["VMAT2"] },
    GeneEntry { symbol: "DDC", aliases: &["AADC"] },
    GeneEntry { symbol: "PRKN", aliases: &["PARK2", "PARKIN"] },
    GeneEntry { symbol: "SNCA", aliases: &["PARK1", "PARK4", "ALPHA-SYNUCLEIN", "NACP"] },
    GeneEntry { symbol: "DRD1", aliases: &[] },
    GeneEntry { symbol: "DRD2", aliases: &[] },
    GeneEntry { symbol: "DRD3", aliases: &[] },
    GeneEntry { symbol: "DRD4", aliases: &[] },
    GeneEntry { symbol: "DRD5", aliases: &[] },
    GeneEntry { symbol: "LRRK2", aliases: &["PARK8", "DARDARIN"] },
    GeneEntry { symbol: "PINK1", aliases: &["PARK6"] },
    GeneEntry { symbol: "PARK7", aliases: &["DJ-1", "DJ1"] },
    GeneEntry { symbol: "UCHL1", aliases: &["PARK5", "PGP9.5"] },
    GeneEntry { symbol: "COMT", aliases: &[] },
    GeneEntry { symbol: "MAOA", aliases: &["MAO"] },
    GeneEntry { symbol: "MAOB", aliases: &[] },
];

fn entry_for(upper: &str) -> Option<&'static GeneEntry> {
    GENES
        .iter()
        .find(|g| g.symbol == upper || g.aliases.contains(&upper))
}

/// Canonical symbol for an identifier (case-insensitive)
pub fn canonical_symbol(identifier: &str) -> String {
    let upper = identifier.trim().to_uppercase();
    match entry_for(&upper) {
        Some(entry) => entry.symbol.to_string(),
        None => upper,
    }
}

/// Known aliases of an identifier's canonical symbol, excluding the
/// identifier itself. Empty for identifiers outside the table.
pub fn aliases(identifier: &str) -> Vec<String> {
    let upper = identifier.trim().to_uppercase();
    let Some(entry) = entry_for(&upper) else {
        return Vec::new();
    };

    std::iter::once(entry.symbol)
        .chain(entry.aliases.iter().copied())
        .filter(|name| *name != upper)
        .map(str::to_string)
        .collect()
}
