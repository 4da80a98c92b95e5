//! The operator library: dice rolling, pool transformation, pool
//! degeneration, success counting, and choice. Dice operators draw through
//! the evaluation context so the roll budget is enforced in one place; pool
//! operators are pure.

use crate::common::{BotchPolicy, Int, NonEmpty, Pool, WildDiePolicy};
use crate::roll::{EvalError, RollContext, Roller, Value};
use std::collections::HashSet;

type OpResult<T> = Result<T, EvalError>;

/// Rolls `num` dice with `size` sides.
pub fn dice_pool<R: Roller>(ctx: &mut RollContext<R>, num: Int, size: Int) -> OpResult<Pool> {
    check_dice(num, size)?;
    (0..num).map(|_| ctx.draw(size)).collect()
}

/// Rolls `num` exploding dice: a die showing its maximum rolls again and
/// adds, repeatedly.
pub fn exploding_pool<R: Roller>(ctx: &mut RollContext<R>, num: Int, size: Int) -> OpResult<Pool> {
    check_dice(num, size)?;
    (0..num).map(|_| explode(ctx, size)).collect()
}

pub fn die<R: Roller>(ctx: &mut RollContext<R>, num: Int, size: Int) -> OpResult<Int> {
    checked_sum(&dice_pool(ctx, num, size)?, "d")
}

pub fn exploding_die<R: Roller>(ctx: &mut RollContext<R>, num: Int, size: Int) -> OpResult<Int> {
    checked_sum(&exploding_pool(ctx, num, size)?, "d!")
}

/// Rolls a pool, reduces each die modulo 10, and concatenates the digits
/// left to right.
pub fn concat_die<R: Roller>(ctx: &mut RollContext<R>, num: Int, size: Int) -> OpResult<Int> {
    let pool = dice_pool(ctx, num, size)?;
    if pool.is_empty() {
        return Err(EvalError::EmptyPool { op: "dc" });
    }
    let digits = Modulo.operate(&pool, 10)?;
    pool_concatenate(&digits)
}

pub fn keep_high_die<R: Roller>(ctx: &mut RollContext<R>, num: Int, size: Int) -> OpResult<Int> {
    let pool = dice_pool(ctx, num, size)?;
    pool.iter().max().copied().ok_or(EvalError::EmptyPool { op: "dh" })
}

pub fn keep_low_die<R: Roller>(ctx: &mut RollContext<R>, num: Int, size: Int) -> OpResult<Int> {
    let pool = dice_pool(ctx, num, size)?;
    pool.iter().min().copied().ok_or(EvalError::EmptyPool { op: "dl" })
}

/// Rolls `num - 1` plain dice plus one exploding wild die. The wild die
/// supplements the plain dice, except that a wild first roll of the minimum
/// face hands the outcome to the wild-die policy.
pub fn wild_die<R: Roller>(
    ctx: &mut RollContext<R>,
    num: Int,
    size: Int,
    policy: WildDiePolicy,
) -> OpResult<Int> {
    if num < 1 {
        return Err(EvalError::InvalidDieCount(num));
    }
    let plain = dice_pool(ctx, num - 1, size)?;
    let first = ctx.draw(size)?;
    let wild = if first == size {
        first
            .checked_add(explode(ctx, size)?)
            .ok_or(EvalError::Overflow("dw"))?
    } else {
        first
    };
    let others = checked_sum(&plain, "dw")?;
    if first == 1 {
        return Ok(match policy {
            WildDiePolicy::ReplaceLowest => match plain.iter().min() {
                // The discarded member is part of `others`, so this cannot
                // overflow past the checked sum above.
                Some(&lowest) => others - lowest + wild,
                None => wild,
            },
            WildDiePolicy::Supplement => others
                .checked_add(wild)
                .ok_or(EvalError::Overflow("dw"))?,
            WildDiePolicy::ZeroRoll => 0,
        });
    }
    others.checked_add(wild).ok_or(EvalError::Overflow("dw"))
}

fn explode<R: Roller>(ctx: &mut RollContext<R>, size: Int) -> OpResult<Int> {
    let mut last = ctx.draw(size)?;
    let mut total = last;
    while last == size {
        last = ctx.draw(size)?;
        total = total.checked_add(last).ok_or(EvalError::Overflow("d!"))?;
    }
    Ok(total)
}

fn check_dice(num: Int, size: Int) -> OpResult<()> {
    if num < 0 {
        return Err(EvalError::InvalidDieCount(num));
    }
    if size < 1 {
        return Err(EvalError::InvalidDieSize(size));
    }
    Ok(())
}

/// The closed set of pool transforms (`pa pb pc pf ph pl pr p%`).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[enum_dispatch::enum_dispatch(PoolOperate)]
pub enum PoolOperator {
    KeepAbove(KeepAbove),
    KeepBelow(KeepBelow),
    Cap(Cap),
    Floor(Floor),
    KeepHigh(KeepHigh),
    KeepLow(KeepLow),
    Remove(Remove),
    Modulo(Modulo),
}

#[enum_dispatch::enum_dispatch]
pub trait PoolOperate {
    fn operate(&self, pool: &[Int], arg: Int) -> OpResult<Pool>;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeepAbove;

impl PoolOperate for KeepAbove {
    fn operate(&self, pool: &[Int], arg: Int) -> OpResult<Pool> {
        Ok(pool.iter().copied().filter(|&m| m > arg).collect())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeepBelow;

impl PoolOperate for KeepBelow {
    fn operate(&self, pool: &[Int], arg: Int) -> OpResult<Pool> {
        Ok(pool.iter().copied().filter(|&m| m < arg).collect())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Cap;

impl PoolOperate for Cap {
    fn operate(&self, pool: &[Int], arg: Int) -> OpResult<Pool> {
        Ok(pool.iter().map(|&m| m.min(arg)).collect())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Floor;

impl PoolOperate for Floor {
    fn operate(&self, pool: &[Int], arg: Int) -> OpResult<Pool> {
        Ok(pool.iter().map(|&m| m.max(arg)).collect())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeepHigh;

impl PoolOperate for KeepHigh {
    fn operate(&self, pool: &[Int], arg: Int) -> OpResult<Pool> {
        Ok(keep_by(pool, arg, |a, b| a < b))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct KeepLow;

impl PoolOperate for KeepLow {
    fn operate(&self, pool: &[Int], arg: Int) -> OpResult<Pool> {
        Ok(keep_by(pool, arg, |a, b| a > b))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Remove;

impl PoolOperate for Remove {
    fn operate(&self, pool: &[Int], arg: Int) -> OpResult<Pool> {
        Ok(pool.iter().copied().filter(|&m| m != arg).collect())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Modulo;

impl PoolOperate for Modulo {
    fn operate(&self, pool: &[Int], arg: Int) -> OpResult<Pool> {
        if arg == 0 {
            return Err(EvalError::ZeroModulo);
        }
        Ok(pool.iter().map(|&m| floor_mod(m, arg)).collect())
    }
}

/// Keeps the `n` members that survive repeatedly discarding the most
/// discardable member (per `worse`), earliest first on ties. Survivors stay
/// in original roll order.
fn keep_by(pool: &[Int], n: Int, worse: impl Fn(Int, Int) -> bool) -> Pool {
    let n = n.max(0) as usize;
    if n >= pool.len() {
        return pool.to_vec();
    }
    let mut order: Vec<usize> = (0..pool.len()).collect();
    order.sort_by(|&a, &b| {
        if worse(pool[a], pool[b]) {
            std::cmp::Ordering::Less
        } else if worse(pool[b], pool[a]) {
            std::cmp::Ordering::Greater
        } else {
            a.cmp(&b)
        }
    });
    let dropped: HashSet<usize> = order[..pool.len() - n].iter().copied().collect();
    pool.iter()
        .enumerate()
        .filter(|(i, _)| !dropped.contains(i))
        .map(|(_, &m)| m)
        .collect()
}

/// Concatenates the decimal renderings of the members and reads the result
/// back as a number.
pub fn pool_concatenate(pool: &[Int]) -> OpResult<Int> {
    if pool.is_empty() {
        return Err(EvalError::EmptyPool { op: "C" });
    }
    let digits: String = pool.iter().map(Int::to_string).collect();
    digits
        .parse()
        .map_err(|_| EvalError::BadConcat(digits.clone()))
}

pub fn pool_count(pool: &[Int]) -> Int {
    pool.len() as Int
}

/// Sums the members; an empty pool sums to 0.
pub fn pool_sum(pool: &[Int]) -> OpResult<Int> {
    checked_sum(pool, "S")
}

fn checked_sum(pool: &[Int], op: &'static str) -> OpResult<Int> {
    pool.iter().try_fold(0, |total: Int, &member| {
        total.checked_add(member).ok_or(EvalError::Overflow(op))
    })
}

/// Counts members at or above the target.
pub fn count_successes(pool: &[Int], target: Int) -> Int {
    pool.iter().filter(|&&m| m >= target).count() as Int
}

/// Successes minus botches, per policy.
pub fn count_successes_with_botch(pool: &[Int], target: Int, policy: BotchPolicy) -> Int {
    let successes = count_successes(pool, target);
    let botches = pool.iter().filter(|&&m| m == policy.botch).count() as Int;
    let net = successes - botches;
    if policy.floor_at_zero {
        net.max(0)
    } else {
        net
    }
}

/// Boolean-driven choice between exactly two options.
pub fn choose(flag: bool, options: &NonEmpty<Value>) -> OpResult<Value> {
    match &options[..] {
        [when_true, when_false] => Ok(if flag {
            when_true.clone()
        } else {
            when_false.clone()
        }),
        _ => Err(EvalError::TypeMismatch {
            op: "?",
            expected: "exactly two options",
            found: "an options list",
        }),
    }
}

/// Uniform pick from a non-empty options list.
pub fn pick<R: Roller>(roller: &mut R, options: &NonEmpty<Value>) -> Value {
    let index = roller.roll(options.len() as Int) - 1;
    options[index as usize].clone()
}

/// Division that rounds toward negative infinity.
pub fn floor_div(a: Int, b: Int) -> OpResult<Int> {
    if b == 0 {
        return Err(EvalError::ZeroDivision);
    }
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

/// Modulus whose result takes the sign of the divisor.
pub fn floor_mod(a: Int, b: Int) -> Int {
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        r + b
    } else {
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vec1::vec1;

    #[test]
    fn keep_above_and_below_are_strict() {
        let pool = [2, 5, 5, 8];
        assert_eq!(KeepAbove.operate(&pool, 5).unwrap(), vec![8]);
        assert_eq!(KeepBelow.operate(&pool, 5).unwrap(), vec![2]);
    }

    #[test]
    fn cap_and_floor_clamp_members() {
        let pool = [1, 6, 9];
        assert_eq!(Cap.operate(&pool, 6).unwrap(), vec![1, 6, 6]);
        assert_eq!(Floor.operate(&pool, 6).unwrap(), vec![6, 6, 9]);
    }

    #[test]
    fn keep_high_preserves_roll_order() {
        assert_eq!(KeepHigh.operate(&[4, 10, 3, 5, 1, 9], 2).unwrap(), vec![10, 9]);
        // The earliest of tied lowest members is discarded first.
        assert_eq!(KeepHigh.operate(&[3, 3, 5], 2).unwrap(), vec![3, 5]);
        assert_eq!(KeepHigh.operate(&[3, 5], 7).unwrap(), vec![3, 5]);
        assert_eq!(KeepHigh.operate(&[3, 5], 0).unwrap(), Vec::<Int>::new());
    }

    #[test]
    fn keep_low_preserves_roll_order() {
        assert_eq!(KeepLow.operate(&[4, 10, 3, 5, 1, 9], 3).unwrap(), vec![4, 3, 1]);
        assert_eq!(KeepLow.operate(&[5, 5, 1], 2).unwrap(), vec![5, 1]);
    }

    #[test]
    fn remove_drops_matching_members() {
        assert_eq!(Remove.operate(&[1, 4, 1, 6], 1).unwrap(), vec![4, 6]);
    }

    #[test]
    fn modulo_follows_the_divisor_sign() {
        assert_eq!(Modulo.operate(&[10, 7, -3], 10).unwrap(), vec![0, 7, 7]);
        assert_eq!(Modulo.operate(&[1], 0).unwrap_err(), EvalError::ZeroModulo);
    }

    #[test]
    fn concatenate_reads_digits_left_to_right() {
        assert_eq!(pool_concatenate(&[1, 7, 3, 7]).unwrap(), 1737);
        assert_eq!(pool_concatenate(&[0, 4]).unwrap(), 4);
        assert_eq!(
            pool_concatenate(&[]).unwrap_err(),
            EvalError::EmptyPool { op: "C" },
        );
        // A negative member embeds a sign mid-number.
        assert!(matches!(
            pool_concatenate(&[1, -2]).unwrap_err(),
            EvalError::BadConcat(_),
        ));
    }

    #[test]
    fn pool_sums_are_checked() {
        assert_eq!(pool_sum(&[1, 2, 3]).unwrap(), 6);
        assert_eq!(pool_sum(&[]).unwrap(), 0);
        assert_eq!(
            pool_sum(&[Int::MAX, 1]).unwrap_err(),
            EvalError::Overflow("S"),
        );
    }

    #[test]
    fn success_counting_includes_the_target() {
        assert_eq!(count_successes(&[4, 6, 2, 6], 5), 2);
        assert_eq!(count_successes(&[4, 5, 2], 5), 1);
    }

    #[test]
    fn botches_subtract_and_may_be_floored() {
        let pool = [1, 1, 6, 2];
        assert_eq!(count_successes_with_botch(&pool, 5, BotchPolicy::default()), -1);
        let floored = BotchPolicy {
            floor_at_zero: true,
            ..BotchPolicy::default()
        };
        assert_eq!(count_successes_with_botch(&pool, 5, floored), 0);
        let on_twos = BotchPolicy {
            botch: 2,
            ..BotchPolicy::default()
        };
        assert_eq!(count_successes_with_botch(&pool, 5, on_twos), 0);
    }

    #[test]
    fn boolean_choice_requires_two_options() {
        let options = vec1![Value::Text("yes".into()), Value::Text("no".into())];
        assert_eq!(choose(true, &options).unwrap(), Value::Text("yes".into()));
        assert_eq!(choose(false, &options).unwrap(), Value::Text("no".into()));
        let three = vec1![Value::Int(1), Value::Int(2), Value::Int(3)];
        assert!(choose(true, &three).is_err());
    }

    #[test]
    fn division_and_modulus_round_toward_negative_infinity() {
        assert_eq!(floor_div(7, 2).unwrap(), 3);
        assert_eq!(floor_div(-7, 2).unwrap(), -4);
        assert_eq!(floor_div(7, -2).unwrap(), -4);
        assert_eq!(floor_div(1, 0).unwrap_err(), EvalError::ZeroDivision);
        assert_eq!(floor_mod(-7, 3), 2);
        assert_eq!(floor_mod(7, -3), -2);
    }
}
