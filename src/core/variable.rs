use std::fmt;
use std::fmt::{Display, Formatter};

use rand::{Rng, RngCore};

use crate::core::utils::rand_double;
use crate::core::OError;

/// Check that a lower bound is strictly smaller than the upper bound.
fn check_bounds<N: PartialOrd + Display>(lower: N, upper: N) -> Result<(), OError> {
    if lower >= upper {
        return Err(OError::TooLargeLowerBound(
            lower.to_string(),
            upper.to_string(),
        ));
    }
    Ok(())
}

/// A real number between a lower and upper bound.
#[derive(Clone, Debug, PartialEq)]
pub struct RealVariable {
    /// The variable value.
    value: f64,
    /// The lower bound.
    lower_bound: f64,
    /// The upper bound.
    upper_bound: f64,
}

impl RealVariable {
    /// Create a new real variable with a random value in `[lower_bound, upper_bound)`.
    ///
    /// # Arguments
    ///
    /// * `lower_bound`: The lower bound.
    /// * `upper_bound`: The upper bound.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<RealVariable, OError>`
    pub fn new(lower_bound: f64, upper_bound: f64, rng: &mut dyn RngCore) -> Result<Self, OError> {
        check_bounds(lower_bound, upper_bound)?;
        Ok(Self {
            value: rand_double(rng, lower_bound, upper_bound),
            lower_bound,
            upper_bound,
        })
    }

    /// Create a new real variable with a given value. The value is not checked against the
    /// bounds.
    ///
    /// # Arguments
    ///
    /// * `value`: The value.
    /// * `lower_bound`: The lower bound.
    /// * `upper_bound`: The upper bound.
    ///
    /// returns: `Result<RealVariable, OError>`
    pub fn with_value(value: f64, lower_bound: f64, upper_bound: f64) -> Result<Self, OError> {
        check_bounds(lower_bound, upper_bound)?;
        Ok(Self {
            value,
            lower_bound,
            upper_bound,
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }
}

/// A string of bits.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryVariable {
    bits: Vec<bool>,
}

impl BinaryVariable {
    /// Create a random bit string. Each bit is set with a probability of 0.5.
    ///
    /// # Arguments
    ///
    /// * `number_of_bits`: The length of the string.
    /// * `rng`: The random number generator.
    ///
    /// returns: `BinaryVariable`
    pub fn new(number_of_bits: usize, rng: &mut dyn RngCore) -> Self {
        let bits = (0..number_of_bits).map(|_| rng.gen::<f64>() < 0.5).collect();
        Self { bits }
    }

    /// Create a bit string from its bits.
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// The number of bits in the string.
    pub fn number_of_bits(&self) -> usize {
        self.bits.len()
    }

    /// The bit at the given index. This panics if the index is out of range.
    pub fn bit(&self, index: usize) -> bool {
        self.bits[index]
    }

    /// Set the bit at the given index. This panics if the index is out of range.
    pub fn set_bit(&mut self, index: usize, value: bool) {
        self.bits[index] = value;
    }

    /// Flip the bit at the given index. This panics if the index is out of range.
    pub fn flip(&mut self, index: usize) {
        self.bits[index] = !self.bits[index];
    }

    /// The number of bits set to `1`.
    ///
    /// returns: `usize`
    pub fn cardinality(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Count the positions where two strings differ. Bits beyond the shortest string are not
    /// compared.
    ///
    /// # Arguments
    ///
    /// * `other`: The other bit string.
    ///
    /// returns: `usize`
    pub fn hamming_distance(&self, other: &BinaryVariable) -> usize {
        self.bits
            .iter()
            .zip(other.bits.iter())
            .filter(|(a, b)| a != b)
            .count()
    }

    /// The bits as an unsigned integer, with the first bit as the most significant one.
    fn decimal(&self) -> u64 {
        self.bits
            .iter()
            .fold(0_u64, |acc, bit| (acc << 1) | u64::from(*bit))
    }

    /// Store an unsigned integer in the bits, with the first bit as the most significant one.
    fn encode(&mut self, mut decimal: u64) {
        for bit in self.bits.iter_mut().rev() {
            *bit = decimal & 1 == 1;
            decimal >>= 1;
        }
    }
}

impl Display for BinaryVariable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s: String = self
            .bits
            .iter()
            .map(|b| if *b { '1' } else { '0' })
            .collect();
        f.write_str(&s)
    }
}

/// A bounded real number encoded in a bit string.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryRealVariable {
    bits: BinaryVariable,
    /// The decoded value.
    value: f64,
    lower_bound: f64,
    upper_bound: f64,
}

impl BinaryRealVariable {
    /// The largest number of bits supported by the encoding.
    pub const MAX_BITS: usize = 63;

    /// Create a random binary-coded real. The value is decoded from random bits.
    ///
    /// # Arguments
    ///
    /// * `number_of_bits`: The number of bits used to encode the value (between 1 and
    ///    [`BinaryRealVariable::MAX_BITS`]).
    /// * `lower_bound`: The lower bound.
    /// * `upper_bound`: The upper bound.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<BinaryRealVariable, OError>`
    pub fn new(
        number_of_bits: usize,
        lower_bound: f64,
        upper_bound: f64,
        rng: &mut dyn RngCore,
    ) -> Result<Self, OError> {
        check_bounds(lower_bound, upper_bound)?;
        if !(1..=Self::MAX_BITS).contains(&number_of_bits) {
            return Err(OError::Generic(format!(
                "The number of bits ({number_of_bits}) of a binary-coded real must be between 1 and {}",
                Self::MAX_BITS
            )));
        }
        let mut variable = Self {
            bits: BinaryVariable::new(number_of_bits, rng),
            value: lower_bound,
            lower_bound,
            upper_bound,
        };
        variable.decode();
        Ok(variable)
    }

    /// Update the value from the bits. The bits map linearly onto `[lower_bound, upper_bound]`.
    pub fn decode(&mut self) {
        let max = ((1_u128 << self.bits.number_of_bits()) - 1) as f64;
        self.value =
            self.lower_bound + self.bits.decimal() as f64 * (self.upper_bound - self.lower_bound) / max;
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Set the value and store its closest representation in the bits. The value is returned
    /// as given by [`BinaryRealVariable::value`] until the next [`BinaryRealVariable::decode`].
    pub fn set_value(&mut self, value: f64) {
        self.value = value;
        let max = ((1_u128 << self.bits.number_of_bits()) - 1) as f64;
        let fraction = ((value - self.lower_bound) / (self.upper_bound - self.lower_bound))
            .clamp(0.0, 1.0);
        self.bits.encode((fraction * max).round() as u64);
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    /// The bit string.
    pub fn bits(&self) -> &BinaryVariable {
        &self.bits
    }

    /// The bit string as mutable. Call [`BinaryRealVariable::decode`] after changing the bits.
    pub fn bits_mut(&mut self) -> &mut BinaryVariable {
        &mut self.bits
    }
}

/// A contiguous array of bounded real numbers. One variable of this type stores all the decision
/// variables of a solution.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayRealVariable {
    values: Vec<f64>,
    lower_bounds: Vec<f64>,
    upper_bounds: Vec<f64>,
}

impl ArrayRealVariable {
    /// Create an array of random real numbers.
    ///
    /// # Arguments
    ///
    /// * `lower_bounds`: The lower bound of each item.
    /// * `upper_bounds`: The upper bound of each item.
    /// * `rng`: The random number generator.
    ///
    /// returns: `Result<ArrayRealVariable, OError>`
    pub fn new(
        lower_bounds: Vec<f64>,
        upper_bounds: Vec<f64>,
        rng: &mut dyn RngCore,
    ) -> Result<Self, OError> {
        Self::check_sizes(lower_bounds.len(), &lower_bounds, &upper_bounds)?;
        let values = lower_bounds
            .iter()
            .zip(upper_bounds.iter())
            .map(|(lb, ub)| rand_double(rng, *lb, *ub))
            .collect();
        Ok(Self {
            values,
            lower_bounds,
            upper_bounds,
        })
    }

    /// Create an array with given values.
    ///
    /// returns: `Result<ArrayRealVariable, OError>`
    pub fn with_values(
        values: Vec<f64>,
        lower_bounds: Vec<f64>,
        upper_bounds: Vec<f64>,
    ) -> Result<Self, OError> {
        Self::check_sizes(values.len(), &lower_bounds, &upper_bounds)?;
        Ok(Self {
            values,
            lower_bounds,
            upper_bounds,
        })
    }

    fn check_sizes(size: usize, lower_bounds: &[f64], upper_bounds: &[f64]) -> Result<(), OError> {
        if lower_bounds.len() != size || upper_bounds.len() != size {
            return Err(OError::Generic(format!(
                "The array of size {size} must have {size} lower and upper bounds, found {} and {}",
                lower_bounds.len(),
                upper_bounds.len()
            )));
        }
        for (lb, ub) in lower_bounds.iter().zip(upper_bounds) {
            check_bounds(*lb, *ub)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The item value. This panics if the index is out of range.
    pub fn value(&self, index: usize) -> f64 {
        self.values[index]
    }

    /// Set the item value. This panics if the index is out of range.
    pub fn set_value(&mut self, index: usize, value: f64) {
        self.values[index] = value;
    }

    pub fn lower_bound(&self, index: usize) -> f64 {
        self.lower_bounds[index]
    }

    pub fn upper_bound(&self, index: usize) -> f64 {
        self.upper_bounds[index]
    }
}

/// An integer between a lower and upper bound.
#[derive(Clone, Debug, PartialEq)]
pub struct IntVariable {
    value: i64,
    lower_bound: i64,
    upper_bound: i64,
}

impl IntVariable {
    /// Create a new integer variable with a random value in `[lower_bound, upper_bound]`.
    ///
    /// returns: `Result<IntVariable, OError>`
    pub fn new(lower_bound: i64, upper_bound: i64, rng: &mut dyn RngCore) -> Result<Self, OError> {
        check_bounds(lower_bound, upper_bound)?;
        Ok(Self {
            value: rng.gen_range(lower_bound..=upper_bound),
            lower_bound,
            upper_bound,
        })
    }

    /// Create a new integer variable with a given value.
    ///
    /// returns: `Result<IntVariable, OError>`
    pub fn with_value(value: i64, lower_bound: i64, upper_bound: i64) -> Result<Self, OError> {
        check_bounds(lower_bound, upper_bound)?;
        Ok(Self {
            value,
            lower_bound,
            upper_bound,
        })
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn set_value(&mut self, value: i64) {
        self.value = value;
    }

    pub fn lower_bound(&self) -> i64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> i64 {
        self.upper_bound
    }
}

/// A decision variable. The set of encodings is closed: operators that work on real numbers
/// access the variables through [`crate::core::NumericView`].
#[derive(Clone, Debug, PartialEq)]
pub enum Variable {
    /// A bounded real number.
    Real(RealVariable),
    /// A bounded real number encoded in a bit string.
    BinaryReal(BinaryRealVariable),
    /// An array of bounded real numbers.
    ArrayReal(ArrayRealVariable),
    /// A bit string.
    Binary(BinaryVariable),
    /// A bounded integer.
    Int(IntVariable),
}

impl Variable {
    /// The scalar value of the variable, if the variable has one. Integers are converted to
    /// real numbers.
    ///
    /// returns: `Option<f64>`
    pub fn value(&self) -> Option<f64> {
        match self {
            Variable::Real(v) => Some(v.value()),
            Variable::BinaryReal(v) => Some(v.value()),
            Variable::Int(v) => Some(v.value() as f64),
            Variable::ArrayReal(_) | Variable::Binary(_) => None,
        }
    }

    /// The lower bound of a scalar bounded variable.
    ///
    /// returns: `Option<f64>`
    pub fn lower_bound(&self) -> Option<f64> {
        match self {
            Variable::Real(v) => Some(v.lower_bound()),
            Variable::BinaryReal(v) => Some(v.lower_bound()),
            Variable::Int(v) => Some(v.lower_bound() as f64),
            Variable::ArrayReal(_) | Variable::Binary(_) => None,
        }
    }

    /// The upper bound of a scalar bounded variable.
    ///
    /// returns: `Option<f64>`
    pub fn upper_bound(&self) -> Option<f64> {
        match self {
            Variable::Real(v) => Some(v.upper_bound()),
            Variable::BinaryReal(v) => Some(v.upper_bound()),
            Variable::Int(v) => Some(v.upper_bound() as f64),
            Variable::ArrayReal(_) | Variable::Binary(_) => None,
        }
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Real(v) => write!(f, "{}", v.value()),
            Variable::BinaryReal(v) => write!(f, "{}", v.value()),
            Variable::ArrayReal(v) => {
                let items: Vec<String> = v.values().iter().map(|x| x.to_string()).collect();
                write!(f, "{}", items.join(" "))
            }
            Variable::Binary(v) => write!(f, "{v}"),
            Variable::Int(v) => write!(f, "{}", v.value()),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::core::utils::get_rng;
    use crate::core::{
        ArrayRealVariable, BinaryRealVariable, BinaryVariable, IntVariable, RealVariable, Variable,
    };

    #[test]
    /// Bounds must be ordered.
    fn test_bounds() {
        let mut rng = get_rng(Some(1));
        assert!(RealVariable::new(1.0, 1.0, &mut rng).is_err());
        assert!(IntVariable::new(3, -1, &mut rng).is_err());
        assert!(ArrayRealVariable::with_values(vec![0.0], vec![0.0, 0.0], vec![1.0]).is_err());
        assert!(BinaryRealVariable::new(0, 0.0, 1.0, &mut rng).is_err());
        assert!(BinaryRealVariable::new(64, 0.0, 1.0, &mut rng).is_err());

        for _ in 0..100 {
            let v = RealVariable::new(-2.0, 5.0, &mut rng).unwrap();
            assert!((-2.0..5.0).contains(&v.value()));
            let v = IntVariable::new(-2, 5, &mut rng).unwrap();
            assert!((-2..=5).contains(&v.value()));
        }
    }

    #[test]
    fn test_binary() {
        let mut a = BinaryVariable::from_bits(vec![true, false, true, true]);
        let b = BinaryVariable::from_bits(vec![false, false, true, false]);
        assert_eq!(a.cardinality(), 3);
        assert_eq!(a.hamming_distance(&b), 2);
        assert_eq!(a.to_string(), "1011");

        a.flip(0);
        assert!(!a.bit(0));
        assert_eq!(a.to_string(), "0011");
        assert_eq!(a.decimal(), 3);

        a.encode(10);
        assert_eq!(a.to_string(), "1010");
    }

    #[test]
    /// The bits are decoded linearly between the bounds.
    fn test_binary_real_decode() {
        let mut rng = get_rng(Some(1));
        let mut v = BinaryRealVariable::new(4, 0.0, 15.0, &mut rng).unwrap();
        for (i, bit) in [true, false, false, true].iter().enumerate() {
            v.bits_mut().set_bit(i, *bit);
        }
        v.decode();
        assert_eq!(v.value(), 9.0);

        v.set_value(15.0);
        assert_eq!(v.bits().to_string(), "1111");
        v.set_value(4.2);
        assert_eq!(v.value(), 4.2);
        v.decode();
        assert_eq!(v.value(), 4.0);
    }

    #[test]
    fn test_scalar_access() {
        let v = Variable::Int(IntVariable::with_value(3, 0, 10).unwrap());
        assert_eq!(v.value(), Some(3.0));
        assert_eq!(v.upper_bound(), Some(10.0));

        let v = Variable::Binary(BinaryVariable::from_bits(vec![true]));
        assert_eq!(v.value(), None);
        assert_eq!(v.lower_bound(), None);
    }
}
