//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - fragments mêlant LaTeX cassé, glyphes Unicode, ±, listes
//! - budget temps global
//! - invariant clé : comparer() ne panique jamais (le catch_unwind n'est qu'un filet)

use std::time::{Duration, Instant};

use super::comparaison::{comparer, is_answer_correct};
use super::eval::evaluer_branche;
use super::normalise::normaliser;
use super::options::{developper, MAX_BRANCHES};
use super::tolerance::Tolerance;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération (bornée) ------------------------ */

const FRAGMENTS: &[&str] = &[
    "\\frac", "{", "}", "(", ")", "[", "]", "|", "\\left", "\\right", "\\sqrt", "√", "∛",
    "²", "³", "^", "_", "\\log", "log", "ln", "sin", "°", "\\circ", "π", "\\pi", "∞",
    "±", "+-", "\\pm", ";", ",", ".", ":", "÷", "×", "\\cdot", "−", "-", "+", "*", "/",
    "!", "%", "=", "x", "e", "∅", "нет", " ", "\\", "\\text{", "nthRoot", "\u{0}",
    "😀", "٣", "ⅷ",
];

fn gen_chiffres(rng: &mut Rng) -> String {
    let n = 1 + rng.pick(4);
    (0..n).map(|_| char::from(b'0' + rng.pick(10) as u8)).collect()
}

/// Fragments au hasard : la plupart des sorties sont malformées (c'est le but).
fn gen_bruit(rng: &mut Rng, longueur: usize) -> String {
    let mut s = String::new();
    for _ in 0..longueur {
        if rng.coin() {
            s.push_str(&gen_chiffres(rng));
        } else {
            let i = rng.pick(FRAGMENTS.len() as u32) as usize;
            s.push_str(FRAGMENTS[i]);
        }
    }
    s
}

/// Expressions bien formées (évaluables le plus souvent).
fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return match rng.pick(4) {
            0 => "pi".to_string(),
            1 => format!("{}.{}", gen_chiffres(rng), gen_chiffres(rng)),
            _ => gen_chiffres(rng),
        };
    }

    match rng.pick(8) {
        0 => format!("({}+{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        1 => format!("({}-{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        2 => format!("{}\\cdot {}", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        3 => format!(
            "\\frac{{{}}}{{{}}}",
            gen_expr(rng, depth - 1),
            gen_expr(rng, depth - 1)
        ),
        4 => format!("\\sqrt{{{}}}", gen_expr(rng, depth - 1)),
        5 => format!("sin({}°)", gen_expr(rng, depth - 1)),
        6 => format!("|{}|", gen_expr(rng, depth - 1)),
        _ => gen_expr(rng, 0),
    }
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_bruit_jamais_de_panique() {
    let t0 = Instant::now();
    let max = Duration::from_millis(2000);
    let tol = Tolerance::default();

    let mut rng = Rng::new(0xC0FFEE_u64);

    for _ in 0..400 {
        budget(t0, max);

        let longueur = 1 + rng.pick(12) as usize;
        let s = gen_bruit(&mut rng, longueur);
        let c = gen_bruit(&mut rng, longueur);

        // sans le filet catch_unwind : une panique ferait échouer le test
        let _ = normaliser(&s);
        let _ = evaluer_branche(&s);
        let _ = comparer(&s, &c, &tol);
        let _ = comparer(&s, &s, &tol);
    }
}

#[test]
fn fuzz_safe_determinisme() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1000);

    let mut a = Rng::new(0xBADC0DE_u64);
    let mut b = a.clone();

    for _ in 0..150 {
        budget(t0, max);

        let s1 = gen_bruit(&mut a, 6);
        let s2 = gen_bruit(&mut b, 6);
        assert_eq!(s1, s2);

        let c = gen_expr(&mut a, 2);
        let _ = gen_expr(&mut b, 2);

        assert_eq!(normaliser(&s1), normaliser(&s2));
        assert_eq!(is_answer_correct(&s1, &c), is_answer_correct(&s2, &c));
    }
}

#[test]
fn fuzz_safe_expressions_reflexives() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1500);

    let mut rng = Rng::new(0x5EED_u64);
    let mut evaluees = 0usize;

    for _ in 0..200 {
        budget(t0, max);

        let e = gen_expr(&mut rng, 3);
        if evaluer_branche(&e).is_ok() {
            evaluees += 1;
        }
        // évaluable ou non, une réponse est équivalente à elle-même
        assert!(is_answer_correct(&e, &e), "non réflexif: {e:?}");
    }

    // le générateur doit produire surtout du calculable, sinon il ne teste rien
    assert!(evaluees > 50, "trop peu d'expressions évaluées: {evaluees}");
}

#[test]
fn fuzz_safe_plus_moins_cardinal() {
    let mut rng = Rng::new(0xDEC0DE_u64);

    for _ in 0..60 {
        let k = rng.pick(9) as usize;
        let mut s = gen_expr(&mut rng, 1);
        for _ in 0..k {
            let marqueur = match rng.pick(3) {
                0 => " ± ",
                1 => "+-",
                _ => " \\pm ",
            };
            s.push_str(marqueur);
            s.push_str(&gen_expr(&mut rng, 1));
        }
        let n = developper(&s).map(|b| b.len()).unwrap_or(0);
        assert_eq!(n, 1 << k, "s={s:?}");
    }
}

#[test]
fn fuzz_safe_imbrication_profonde() {
    let t0 = Instant::now();
    let max = Duration::from_millis(1500);

    for s in [
        format!("{}1{}", "(".repeat(5000), ")".repeat(5000)),
        format!("{}1{}", "\\frac{".repeat(2000), "}{2}".repeat(2000)),
        format!("{}4{}", "\\sqrt{".repeat(3000), "}".repeat(3000)),
        "|".repeat(5000),
        "-".repeat(20_000) + "1",
        "{".repeat(20_000),
        format!("{}5{}", "\\left(".repeat(1000), "\\right)".repeat(1000)),
        format!("{}1{}", "(± ".repeat(200), ")".repeat(200)),
    ] {
        budget(t0, max);
        let _ = is_answer_correct(&s, &s);
        let _ = is_answer_correct(&s, "1");
        let _ = comparer(&s, "1", &Tolerance::default());
    }
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let expr = somme_balancee("1/2", 800);
    budget(t0, max);

    // 800*(1/2) = 400
    assert!(is_answer_correct(&expr, "400"));
    budget(t0, max);
}

#[test]
fn fuzz_safe_explosion_bornee() {
    // 2^13 > MAX_BRANCHES : refus explicite, jamais d'allocation exponentielle
    let s = "1 ± ".repeat(13) + "1";
    assert!(developper(&s).is_err());
    assert!(MAX_BRANCHES < 1 << 13);
    assert!(is_answer_correct(&s, &s));
}
