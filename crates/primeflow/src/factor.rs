//! Trial-division prime factorization.

/// Decomposes `n` into its prime factors, in ascending order.
///
/// - `0`, `1` and `-1` map to themselves as single-element lists.
/// - Negative numbers start with `-1`, followed by the prime factors of the
///   magnitude.
///
/// The magnitude is taken with [`isize::unsigned_abs`], so `isize::MIN` is
/// handled without overflow; its factors are `-1` followed by `2` repeated
/// `isize::BITS - 1` times.
///
/// Runs in `O(sqrt(|n|))` and never fails.
///
/// ```
/// assert_eq!(primeflow::factorize(100), vec![2, 2, 5, 5]);
/// assert_eq!(primeflow::factorize(-17), vec![-1, 17]);
/// assert_eq!(primeflow::factorize(0), vec![0]);
/// ```
pub fn factorize(n: isize) -> Vec<isize> {
    if matches!(n, -1..=1) {
        return vec![n];
    }

    let mut m = n.unsigned_abs();
    let mut factors = Vec::new();
    if n < 0 {
        factors.push(-1);
    }

    let mut d: usize = 2;
    // `d <= m / d` is `d * d <= m` without the overflow.
    while d <= m / d {
        while m % d == 0 {
            factors.push(d as isize);
            m /= d;
        }
        d += 1;
    }

    // What is left has no divisor up to its square root, so it is prime.
    if m > 1 {
        // `m` is only above `isize::MAX` for `isize::MIN`, which is a power of
        // two and therefore fully consumed by the loop.
        factors.push(m as isize);
    }

    factors
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn is_prime(n: isize) -> bool {
        if n < 2 {
            return false;
        }
        let n = n as usize;
        let mut d = 2;
        while d <= n / d {
            if n % d == 0 {
                return false;
            }
            d += 1;
        }
        true
    }

    fn check(n: isize) {
        let factors = factorize(n);
        assert!(!factors.is_empty(), "{n}: empty factor list");
        assert!(factors.is_sorted(), "{n}: {factors:?} not ascending");

        let product = factors.iter().fold(1_isize, |acc, f| acc.wrapping_mul(*f));
        assert_eq!(product, n, "{n}: {factors:?} multiplies to {product}");

        if matches!(n, -1..=1) {
            assert_eq!(factors, vec![n]);
            return;
        }

        let (sign, rest) = if n < 0 {
            assert_eq!(factors[0], -1, "{n}: {factors:?} missing sign");
            (1, &factors[1..])
        } else {
            (0, &factors[..])
        };
        assert_eq!(factors.iter().filter(|f| **f == -1).count(), sign);
        for f in rest {
            assert!(is_prime(*f), "{n}: {f} is not prime");
        }
    }

    #[test]
    fn trivial_values_map_to_themselves() {
        assert_eq!(factorize(0), vec![0]);
        assert_eq!(factorize(1), vec![1]);
        assert_eq!(factorize(-1), vec![-1]);
    }

    #[test]
    fn small_composites() {
        assert_eq!(factorize(4), vec![2, 2]);
        assert_eq!(factorize(12), vec![2, 2, 3]);
        assert_eq!(factorize(27), vec![3, 3, 3]);
        assert_eq!(factorize(38), vec![2, 19]);
        assert_eq!(factorize(100), vec![2, 2, 5, 5]);
        assert_eq!(factorize(-20), vec![-1, 2, 2, 5]);
    }

    #[test]
    fn primes_stay_whole() {
        assert_eq!(factorize(2), vec![2]);
        assert_eq!(factorize(19), vec![19]);
        assert_eq!(factorize(-17), vec![-1, 17]);
        assert_eq!(factorize(2_147_483_647), vec![2_147_483_647]);
    }

    #[test]
    fn power_of_two() {
        assert_eq!(factorize(1 << 30), vec![2; 30]);
    }

    #[test]
    fn minimum_value_does_not_overflow() {
        let factors = factorize(isize::MIN);
        assert_eq!(factors[0], -1);
        assert_eq!(factors.len(), isize::BITS as usize);
        assert!(factors[1..].iter().all(|f| *f == 2));
        check(isize::MIN);
    }

    #[test]
    fn extremes_are_consistent() {
        check(isize::MIN + 1);
        check(isize::MAX);
        check(i32::MAX as isize - 13);
    }

    #[test]
    fn randomized_properties() {
        let mut rng = rand::rng();
        for n in -1_000..=1_000 {
            check(n);
        }
        for _ in 0..2_000 {
            check(rng.random_range(-1_000_000_000_i64..=1_000_000_000) as isize);
        }
    }
}
