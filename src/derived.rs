use crate::models::AirbnbPotential;

/// Two and three bedroom flats rent best short-term
pub fn airbnb_potential(true_bedrooms: u32) -> AirbnbPotential {
    match true_bedrooms {
        2 | 3 => AirbnbPotential::High,
        _ => AirbnbPotential::Medium,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_potential_by_bedrooms() {
        assert_eq!(airbnb_potential(1), AirbnbPotential::Medium);
        assert_eq!(airbnb_potential(2), AirbnbPotential::High);
        assert_eq!(airbnb_potential(3), AirbnbPotential::High);
        assert_eq!(airbnb_potential(4), AirbnbPotential::Medium);
        assert_eq!(airbnb_potential(0), AirbnbPotential::Medium);
    }
}
