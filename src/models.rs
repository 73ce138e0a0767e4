use clap::ValueEnum;

/// Selectable models for the research call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Model {
    /// Fast, roughly $0.13 per search
    Haiku,
    /// Better matches, roughly $0.50 per search
    Sonnet,
}

impl Model {
    pub fn id(self) -> &'static str {
        match self {
            Model::Haiku => "claude-haiku-4-5-20251001",
            Model::Sonnet => "claude-sonnet-4-6",
        }
    }

    /// (input, output) USD per million tokens.
    fn pricing(self) -> (f64, f64) {
        match self {
            Model::Haiku => (0.80, 4.0),
            Model::Sonnet => (3.0, 15.0),
        }
    }

    pub fn estimate_cost_usd(self, input_tokens: u64, output_tokens: u64) -> f64 {
        let (input_rate, output_rate) = self.pricing();
        (input_tokens as f64 * input_rate + output_tokens as f64 * output_rate) / 1_000_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haiku_cost_per_million_each_way() {
        let cost = Model::Haiku.estimate_cost_usd(1_000_000, 1_000_000);
        assert!((cost - 4.80).abs() < 1e-9);
    }

    #[test]
    fn sonnet_costs_more() {
        let haiku = Model::Haiku.estimate_cost_usd(10_000, 1_000);
        let sonnet = Model::Sonnet.estimate_cost_usd(10_000, 1_000);
        assert!(sonnet > haiku);
    }
}
