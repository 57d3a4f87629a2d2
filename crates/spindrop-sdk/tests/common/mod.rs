#![allow(dead_code)]

use solana_sdk::pubkey::Pubkey;
use spindrop_merkle::keccak256;
use spindrop_sdk::{compile_airdrop, AirdropSpec, CompiledAirdrop};

pub const NOW: i64 = 1_760_000_000;

/// Stable pubkey derived from a readable name
pub fn deterministic_pubkey(name: &str) -> Pubkey {
    Pubkey::new_from_array(keccak256(&[name.as_bytes()]))
}

/// A small allocation list with human-readable amounts
pub struct AllocationFixture {
    pub entries: Vec<(String, String)>,
}

impl Default for AllocationFixture {
    fn default() -> Self {
        Self::from_names(&[
            ("early_adopter_1", "1"),
            ("early_adopter_2", "2"),
            ("power_user_1", "10.5"),
            ("power_user_2", "0.000000001"),
            ("early_adopter_1", "4"),
            ("whale_1", "1000"),
            ("staker_1", "3.333333333"),
        ])
    }
}

impl AllocationFixture {
    pub fn from_names(entries: &[(&str, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(name, amount)| (deterministic_pubkey(name).to_string(), amount.to_string()))
                .collect(),
        }
    }

    /// Allocation file text, header first
    pub fn to_csv(&self) -> String {
        let mut text = String::from("Recipient,Amount\n");
        for (address, amount) in &self.entries {
            text.push_str(&format!("{address},{amount}\n"));
        }
        text
    }

    pub fn compile(&self, spec: &AirdropSpec) -> CompiledAirdrop {
        compile_airdrop(spec, self.to_csv().as_bytes(), NOW).expect("fixture should compile")
    }
}

pub fn default_spec() -> AirdropSpec {
    AirdropSpec::new("fixture", deterministic_pubkey("mint"), 9)
}
