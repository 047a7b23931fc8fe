/// Counters from one pipeline run.
#[derive(Debug, Default)]
pub struct PipelineStats {
    pub records_read: u64,
    pub skipped_short: u64,
    pub skipped_duplicate: u64,
    pub relevant: u64,
    pub irrelevant: u64,
    pub persisted: u64,
    pub service_errors: u64,
    pub malformed_responses: u64,
}

impl std::fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Pipeline Run Complete ===")?;
        writeln!(f, "Records read:        {}", self.records_read)?;
        writeln!(f, "Skipped (short):     {}", self.skipped_short)?;
        writeln!(f, "Skipped (duplicate): {}", self.skipped_duplicate)?;
        writeln!(f, "Relevant:            {}", self.relevant)?;
        writeln!(f, "Irrelevant:          {}", self.irrelevant)?;
        writeln!(f, "Persisted:           {}", self.persisted)?;
        writeln!(f, "Service errors:      {}", self.service_errors)?;
        writeln!(f, "Malformed responses: {}", self.malformed_responses)?;
        Ok(())
    }
}
