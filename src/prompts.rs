/// Instruction sent ahead of every uploaded image.
pub const VIBE_ANALYSIS: &str = include_str!("../data/prompts/vibe_analysis.txt");
