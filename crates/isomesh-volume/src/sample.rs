/// Scalar element type a volume can hold.
///
/// Classification compares samples in their own type (`value > threshold`), so
/// unsigned and integer volumes need no sentinel value. Interpolation widens to
/// `f64`.
pub trait Sample: Copy + PartialOrd + Send + Sync + 'static {
    fn to_f64(self) -> f64;
}

macro_rules! impl_sample {
    ($($t:ty),* $(,)?) => {
        $(
            impl Sample for $t {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_sample!(u8, i8, u16, i16, u32, i32, f32, f64);

#[cfg(test)]
mod tests {
    use super::Sample;

    #[test]
    fn widening_is_exact_for_integer_extremes() {
        assert_eq!(u8::MAX.to_f64(), 255.0);
        assert_eq!(i16::MIN.to_f64(), -32768.0);
        assert_eq!(u32::MAX.to_f64(), 4_294_967_295.0);
        assert_eq!(i32::MIN.to_f64(), -2_147_483_648.0);
        assert_eq!(0.25f32.to_f64(), 0.25);
    }
}
