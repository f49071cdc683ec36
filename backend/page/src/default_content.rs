//! Canned content for the bundled default image.

/// Shown with the bundled corn snake photo. No inference call is made for it.
pub const DEFAULT_ANALYSIS: &str = "1. Species Identification:
- Scientific name: Pantherophis guttatus
- Common names: Corn Snake, Red Rat Snake
- Family: Colubridae
- Confidence: Educational identification only

2. Physical Characteristics:
- Length: 3-6 feet (91-183 cm)
- Pattern: Orange/red base with red saddles outlined in black
- Scales: Smooth
- Head Shape: Slightly wider than neck
- Distinctive Features: Checkerboard pattern on belly

3. Habitat & Distribution:
- Environment: Woodlands, fields, farmland
- Geographic Range: Eastern United States
- Preferred Climate: Temperate to subtropical
- Activity Pattern: Most active at dawn and dusk
- Common Locations: Ground level to tree canopy

4. Educational Notes:
- Behavior: Non-venomous, docile nature
- Diet: Primarily rodents and small mammals
- Ecological Role: Natural pest control
- Conservation Status: Not threatened
- Cultural Significance: Popular in pet trade

5. Safety Information:
- Venomous Status: NON-VENOMOUS
- Temperament: Generally calm and non-aggressive
- Human Interaction: Avoid handling wild snakes
- First Aid: Not typically necessary
- Warning: Never attempt to handle any wild snake";

pub const RESULTS_HEADING: &str = "Snake Analysis Results";

pub const SAFETY_DISCLAIMER_TITLE: &str = "Important Safety Disclaimer";

pub const SAFETY_DISCLAIMER: &str = "This identification is for educational purposes only. \
Never approach or handle wild snakes based on digital identification. \
Snake misidentification can be extremely dangerous and potentially lethal. \
Always maintain a safe distance and contact professional snake handlers if a snake needs to be removed.";
