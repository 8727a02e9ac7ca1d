//! Weight export/import utilities for trained models

use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use anyhow::{ensure, Result};

use super::A2CInference;

impl A2CInference {
    /// Save model to JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Load model from JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let model: Self = serde_json::from_str(&contents)?;
        model.check_dimensions()?;
        Ok(model)
    }

    /// Save model to binary format (bincode)
    /// Only available with the "training" feature
    #[cfg(feature = "training")]
    pub fn save_bincode<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let encoded = bincode::serialize(self)?;
        let mut file = File::create(path)?;
        file.write_all(&encoded)?;
        Ok(())
    }

    /// Load model from binary format (bincode)
    /// Only available with the "training" feature
    #[cfg(feature = "training")]
    pub fn load_bincode<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;
        let model: Self = bincode::deserialize(&buffer)?;
        model.check_dimensions()?;
        Ok(model)
    }

    /// Verify that the layers chain together for the declared grid size
    pub fn check_dimensions(&self) -> Result<()> {
        let conv_in = self.in_channels + if self.coord_conv { 2 } else { 0 };
        ensure!(self.conv.in_channels == conv_in, "conv expects {conv_in} input channels");
        ensure!(
            self.conv.weights.len() == self.conv.out_channels * self.conv.in_channels * 9,
            "conv kernel size mismatch"
        );
        ensure!(
            self.linear.in_features == self.conv.out_channels * self.size * self.size,
            "linear layer does not match conv output"
        );
        ensure!(
            self.value_head.in_features == self.linear.out_features
                && self.policy_head.in_features == self.linear.out_features,
            "heads do not match hidden layer"
        );
        ensure!(self.value_head.out_features == 1, "value head must have one output");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use tempfile::NamedTempFile;

    use super::*;

    fn create_test_model() -> A2CInference {
        A2CInference::random(11, 2, true, &mut StdRng::seed_from_u64(3))
    }

    #[test]
    fn test_json_roundtrip() -> Result<()> {
        let model = create_test_model();
        let temp_file = NamedTempFile::new()?;

        model.save_json(temp_file.path())?;
        let loaded = A2CInference::load_json(temp_file.path())?;

        assert_eq!(model.size, loaded.size);
        assert_eq!(model.coord_conv, loaded.coord_conv);
        assert_eq!(model.conv.out_channels, loaded.conv.out_channels);

        Ok(())
    }

    #[test]
    fn test_load_rejects_mismatched_layers() -> Result<()> {
        let mut model = create_test_model();
        model.size = 12;
        let temp_file = NamedTempFile::new()?;

        model.save_json(temp_file.path())?;
        assert!(A2CInference::load_json(temp_file.path()).is_err());

        Ok(())
    }

    #[test]
    #[cfg(feature = "training")]
    fn test_bincode_roundtrip() -> Result<()> {
        let model = create_test_model();
        let temp_file = NamedTempFile::new()?;

        model.save_bincode(temp_file.path())?;
        let loaded = A2CInference::load_bincode(temp_file.path())?;

        assert_eq!(model, loaded);

        Ok(())
    }
}
