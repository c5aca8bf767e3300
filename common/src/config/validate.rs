/// Range and consistency checks run after a config is parsed and before it
/// is written back.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
