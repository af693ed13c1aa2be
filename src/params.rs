//! Live simulation parameters, owned by the host and edited through the menu.

/// Handle naming one stored parameter. Menu entries bind to parameters through
/// these instead of raw addresses, so the storage only has to outlive the
/// store itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamId {
    Conductivity,
    SpecificHeat,
    Density,
    Convection,
    IntegrationScheme,
}

/// Material and integration parameters read by the solver once per step.
///
/// The integration scheme is stored as `f32` like everything else because the
/// menu edits plain floats; the solver validates and truncates it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SimParams {
    /// Thermal conductivity W/(m*K)
    pub conductivity: f32,
    /// Specific heat J/(kg*K)
    pub specific_heat: f32,
    /// Density kg/m^3
    pub density: f32,
    /// Convective coefficient to ambient air W/(m^2*K)
    pub convection: f32,
    /// Gauss-Legendre scheme index (scheme + 1 points per element)
    pub integration_scheme: f32,
}

impl Default for SimParams {
    /// Carbon-steel rod in still air.
    fn default() -> Self {
        Self {
            conductivity: 25.0,
            specific_heat: 700.0,
            density: 7800.0,
            convection: 300.0,
            integration_scheme: 1.0,
        }
    }
}

impl SimParams {
    pub fn get(&self, id: ParamId) -> f32 {
        match id {
            ParamId::Conductivity => self.conductivity,
            ParamId::SpecificHeat => self.specific_heat,
            ParamId::Density => self.density,
            ParamId::Convection => self.convection,
            ParamId::IntegrationScheme => self.integration_scheme,
        }
    }

    pub fn set(&mut self, id: ParamId, value: f32) {
        match id {
            ParamId::Conductivity => self.conductivity = value,
            ParamId::SpecificHeat => self.specific_heat = value,
            ParamId::Density => self.density = value,
            ParamId::Convection => self.convection = value,
            ParamId::IntegrationScheme => self.integration_scheme = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_round_trip() {
        let mut params = SimParams::default();
        let ids = [
            ParamId::Conductivity,
            ParamId::SpecificHeat,
            ParamId::Density,
            ParamId::Convection,
            ParamId::IntegrationScheme,
        ];
        for (i, id) in ids.iter().enumerate() {
            params.set(*id, i as f32 + 0.5);
        }
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(params.get(*id), i as f32 + 0.5);
        }
    }
}
