/// Instruction sent with every image. Asks for the five-section template and
/// keeps the answer educational.
pub const SNAKE_ANALYSIS_PROMPT: &str = "Analyze this snake image for educational purposes and provide the following information:
1. Species identification (scientific name, common names, family)
2. Physical characteristics (length, pattern, scales, head shape)
3. Habitat & distribution
4. Educational notes (behavior, diet, ecology)
5. Safety information (venomous status, warnings)

IMPORTANT: Emphasize that this is for educational purposes only and should never be used for approaching or handling snakes.";
