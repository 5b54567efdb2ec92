use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::encoding::open_columns;
use super::MoveOracle;
use crate::error::OracleError;

/// An oracle that selects uniformly at random from the open columns.
pub struct RandomOracle {
    rng: Mutex<StdRng>,
}

impl RandomOracle {
    pub fn new() -> Self {
        RandomOracle {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomOracle {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MoveOracle for RandomOracle {
    fn name(&self) -> &str {
        "Random"
    }

    async fn best_move(&self, board: &[Vec<u8>], _variant: &str) -> Result<usize, OracleError> {
        let open = open_columns(board);
        if open.is_empty() {
            return Err(OracleError::Unavailable("no open columns".to_string()));
        }
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| OracleError::Unavailable("random source poisoned".to_string()))?;
        let idx = rng.random_range(0..open.len());
        Ok(open[idx])
    }

    async fn health(&self) -> Result<(), OracleError> {
        Ok(())
    }
}
