bitflags::bitflags! {
    /// Days on which an airspace is in operation
    ///
    /// The same type doubles as the filter mask applied to a database: an
    /// airspace is active when its schedule shares at least one day with the mask.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct AirspaceActivity: u8 {
        const SUNDAY    = 0b0000_0001;
        const MONDAY    = 0b0000_0010;
        const TUESDAY   = 0b0000_0100;
        const WEDNESDAY = 0b0000_1000;
        const THURSDAY  = 0b0001_0000;
        const FRIDAY    = 0b0010_0000;
        const SATURDAY  = 0b0100_0000;

        const WEEKDAYS = Self::MONDAY.bits()
            | Self::TUESDAY.bits()
            | Self::WEDNESDAY.bits()
            | Self::THURSDAY.bits()
            | Self::FRIDAY.bits();
        const WEEKEND = Self::SATURDAY.bits() | Self::SUNDAY.bits();
    }
}

impl AirspaceActivity {
    /// Mask for a single day of the week, counted from Sunday = 0
    ///
    /// Values beyond 6 wrap around.
    pub fn day_of_week(day: u8) -> Self {
        Self::from_bits_truncate(1 << (day % 7))
    }

    /// Check whether this schedule is in operation under the given mask
    pub fn matches(&self, mask: AirspaceActivity) -> bool {
        self.intersects(mask)
    }
}

impl Default for AirspaceActivity {
    fn default() -> Self {
        Self::all()
    }
}
