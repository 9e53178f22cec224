pub const KB: f64 = 1.380649e-23; // Boltzmann constant in J/K
pub const Q: f64 = 1.602176634e-19; // Elementary charge in C
pub const TEMPERATURE: f64 = 300.0; // Standard temperature in Kelvin
pub const THERMAL_VOLTAGE: f64 = KB * TEMPERATURE / Q; // Thermal voltage at 300K in V
