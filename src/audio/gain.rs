//! 音量增益模块
//!
//! 分贝与线性振幅之间的换算，以及对整段样本应用增益。

/// 将分贝值转换为线性振幅系数：`10^(dB/20)`
#[inline]
pub fn db_to_amplitude(gain_db: f64) -> f64 {
    10f64.powf(gain_db / 20.0)
}

/// 对样本应用增益（就地修改）
///
/// 增益系数每个文件只计算一次；`gain_db == 0` 时样本保持逐位不变。
/// 返回实际使用的线性系数。
pub fn apply_gain(samples: &mut [f32], gain_db: f64) -> f32 {
    if gain_db == 0.0 {
        return 1.0;
    }

    let factor = db_to_amplitude(gain_db) as f32;
    for sample in samples.iter_mut() {
        *sample *= factor;
    }
    factor
}

/// 计算峰值绝对振幅
pub fn peak_amplitude(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |peak, &s| peak.max(s.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_to_amplitude_reference_points() {
        assert_eq!(db_to_amplitude(0.0), 1.0);
        assert!((db_to_amplitude(20.0) - 10.0).abs() < 1e-12);
        assert!((db_to_amplitude(-20.0) - 0.1).abs() < 1e-12);
        assert!((db_to_amplitude(6.0) - 1.995_262_3).abs() < 1e-6);
    }

    #[test]
    fn test_zero_gain_is_bit_identical() {
        let original = vec![0.1f32, -0.333_333, 0.999_999, f32::MIN_POSITIVE, -0.0];
        let mut samples = original.clone();
        let factor = apply_gain(&mut samples, 0.0);

        assert_eq!(factor, 1.0);
        for (a, b) in original.iter().zip(&samples) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_gain_matches_single_precomputed_factor() {
        let original: Vec<f32> = (0..1000).map(|i| ((i as f32) * 0.01).sin() * 0.8).collect();
        for gain_db in [-10.0, -3.5, 1.0, 6.0, 10.0] {
            let mut samples = original.clone();
            let factor = apply_gain(&mut samples, gain_db);
            let expected_factor = db_to_amplitude(gain_db) as f32;

            assert_eq!(factor.to_bits(), expected_factor.to_bits());
            for (raw, scaled) in original.iter().zip(&samples) {
                assert_eq!((raw * expected_factor).to_bits(), scaled.to_bits());
            }
        }
    }

    #[test]
    fn test_peak_ratio_follows_decibels() {
        let original: Vec<f32> = (0..4410).map(|i| ((i as f32) * 0.05).sin() * 0.5).collect();
        let raw_peak = peak_amplitude(&original);

        for gain_db in [-10.0, -6.0, 3.0, 10.0] {
            let mut samples = original.clone();
            apply_gain(&mut samples, gain_db);
            let ratio = peak_amplitude(&samples) as f64 / raw_peak as f64;
            assert!(
                (ratio - db_to_amplitude(gain_db)).abs() < 1e-5,
                "gain {gain_db} dB: ratio {ratio}"
            );
        }
    }
}
