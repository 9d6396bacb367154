/// Airspace classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AirspaceClass {
    #[default]
    Other,
    ClassA,
    ClassB,
    ClassC,
    ClassD,
    ClassE,
    ClassF,
    ClassG,
    ControlZone,
    RestrictedArea,
    ProhibitedArea,
    DangerArea,
    TransponderMandatoryZone,
    RadioMandatoryZone,
    GliderSector,
    WaveWindow,
    Notam,
}

impl AirspaceClass {
    /// Check whether entering this airspace is forbidden or restricted
    /// regardless of clearance
    pub fn is_restrictive(&self) -> bool {
        matches!(
            self,
            AirspaceClass::ProhibitedArea | AirspaceClass::RestrictedArea | AirspaceClass::DangerArea
        )
    }
}
