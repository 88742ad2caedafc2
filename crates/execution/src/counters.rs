#[derive(Debug, Default, Clone, Copy)]
pub struct Counters {
    pub received: u64,
    pub executed: u64,
    pub rejected: u64,
}
