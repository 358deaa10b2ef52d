/// Running average of `value^power` over recorded steps.
#[derive(Debug, Clone)]
pub struct Statistics {
    pub count: usize,
    pub aggregate: f64,
    pub power: u32,
}

impl Statistics {
    pub fn new(power: u32) -> Self {
        Self {
            count: 0,
            aggregate: 0.0,
            power,
        }
    }

    pub fn update(&mut self, value: f64) {
        self.count += 1;
        self.aggregate += if self.power == 1 {
            value
        } else {
            value.powi(self.power as i32)
        };
    }

    /// Mean of the recorded powers, 0 before anything was recorded.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.aggregate / self.count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_powers() {
        let mut s1 = Statistics::new(1);
        let mut s2 = Statistics::new(2);
        for v in [1.0, -1.0, 0.5, 0.5] {
            s1.update(v);
            s2.update(v);
        }
        assert_eq!(s1.count, 4);
        assert_eq!(s1.average(), 0.25);
        assert_eq!(s2.average(), (1.0 + 1.0 + 0.25 + 0.25) / 4.0);
    }

    #[test]
    fn test_empty_average() {
        assert_eq!(Statistics::new(4).average(), 0.0);
    }
}
