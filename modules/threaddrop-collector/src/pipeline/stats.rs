/// Counters from one collection run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub pages_fetched: u32,
    pub items_fetched: u32,
    pub address_candidates: u32,
    pub name_candidates: u32,
    pub addresses_rejected: u32,
    pub names_resolved: u32,
    pub names_unresolved: u32,
    pub duplicates_removed: u32,
    pub addresses_final: u32,
    pub batches_written: u32,
    pub profiles_fetched: u32,
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Collection Run Complete ===")?;
        writeln!(f, "Pages fetched:      {}", self.pages_fetched)?;
        writeln!(f, "Items fetched:      {}", self.items_fetched)?;
        if self.profiles_fetched > 0 {
            writeln!(f, "Profiles fetched:   {}", self.profiles_fetched)?;
        }
        if self.address_candidates + self.name_candidates == 0 {
            return Ok(());
        }
        writeln!(f, "\nCandidates:")?;
        writeln!(f, "  Address-shaped:   {}", self.address_candidates)?;
        writeln!(f, "  Name-shaped:      {}", self.name_candidates)?;
        writeln!(f, "  Rejected:         {}", self.addresses_rejected)?;
        writeln!(f, "  Names resolved:   {}", self.names_resolved)?;
        writeln!(f, "  Names unresolved: {}", self.names_unresolved)?;
        if self.duplicates_removed > 0 {
            writeln!(f, "  Duplicates removed: {}", self.duplicates_removed)?;
        }
        writeln!(f, "\nAddresses:          {}", self.addresses_final)?;
        writeln!(f, "Batches written:    {}", self.batches_written)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_mentions_final_count() {
        let stats = RunStats {
            address_candidates: 3,
            addresses_final: 2,
            batches_written: 1,
            ..Default::default()
        };
        let text = stats.to_string();
        assert!(text.contains("Addresses:          2"));
        assert!(!text.contains("Duplicates removed"));
    }
}
