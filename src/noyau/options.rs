// src/noyau/options.rs
//
// Développement des options d'une réponse : ";" (liste) et "±" (paires symétriques).
//
// Deux passes :
// 1) analyser()  : texte -> arbre Variante (Liste / PlusMoins / Suite / Litteral)
// 2) aplatir()   : arbre -> branches texte (Somme / Difference produites ici)
//
// Règles:
// - ";" ne sépare qu'au niveau 0 (hors (), [], {}).
// - Marqueurs ± : "±", "+-", "\pm".
// - Un segment à k marqueurs donne exactement 2^k branches, y compris pour
//   les marqueurs imbriqués dans un groupe (ex: \frac{-b \pm \sqrt{D}}{2a}).
// - Segments vides ignorés ; entrée non vide (même blanche) => au moins une branche.

use super::erreurs::ErreurComparaison;

/// Nombre max de branches pour une réponse complète.
pub const MAX_BRANCHES: usize = 4096;

/// Profondeur max de groupes traversés pour atteindre un marqueur.
const MAX_PROFONDEUR: usize = 64;

#[derive(Clone, Debug, PartialEq)]
pub enum Variante {
    Litteral(String),
    Somme(Box<Variante>, Box<Variante>),
    Difference(Box<Variante>, Box<Variante>),
    PlusMoins(Box<Variante>, Box<Variante>),
    /// Concaténation (préfixe, contenu de groupe, suffixe).
    Suite(Vec<Variante>),
    /// Alternatives indépendantes.
    Liste(Vec<Variante>),
}

impl Variante {
    /// Nombre de branches produites par aplatir() (saturant).
    pub fn cardinal(&self) -> usize {
        use Variante::*;
        match self {
            Litteral(_) => 1,
            Somme(g, d) | Difference(g, d) => g.cardinal().saturating_mul(d.cardinal()),
            PlusMoins(g, d) => 2usize
                .saturating_mul(g.cardinal())
                .saturating_mul(d.cardinal()),
            Suite(v) => v.iter().fold(1usize, |acc, x| acc.saturating_mul(x.cardinal())),
            Liste(v) => v.iter().fold(0usize, |acc, x| acc.saturating_add(x.cardinal())),
        }
    }

    pub fn aplatir(&self) -> Vec<String> {
        use Variante::*;
        match self {
            Litteral(s) => vec![s.clone()],

            Somme(g, d) => combiner(g, d, '+'),
            Difference(g, d) => combiner(g, d, '-'),

            PlusMoins(g, d) => {
                let mut out = Somme(g.clone(), d.clone()).aplatir();
                out.extend(Difference(g.clone(), d.clone()).aplatir());
                out
            }

            Suite(parts) => {
                let mut acc = vec![String::new()];
                for p in parts {
                    let suites = p.aplatir();
                    let mut next = Vec::with_capacity(acc.len() * suites.len());
                    for a in &acc {
                        for s in &suites {
                            next.push(format!("{a}{s}"));
                        }
                    }
                    acc = next;
                }
                acc
            }

            Liste(items) => items.iter().flat_map(|x| x.aplatir()).collect(),
        }
    }
}

/// API du module : réponse brute -> branches évaluables indépendamment.
pub fn developper(texte: &str) -> Result<Vec<String>, ErreurComparaison> {
    let arbre = analyser(texte)?;
    let n = arbre.cardinal();
    if n > MAX_BRANCHES {
        return Err(ErreurComparaison::TropDeVariantes(n));
    }
    Ok(arbre.aplatir())
}

/// Construit l'arbre des variantes (avant aplatissement).
pub fn analyser(texte: &str) -> Result<Variante, ErreurComparaison> {
    let mut segments = Vec::new();
    for seg in decouper_niveau0(texte, ';') {
        let seg = seg.trim();
        if seg.is_empty() {
            continue;
        }
        segments.push(analyser_segment(seg, 0)?);
    }

    // ";;" ou "   " : aucun segment utile, mais l'entrée n'est pas vide.
    if segments.is_empty() && !texte.is_empty() {
        segments.push(Variante::Litteral(texte.trim().to_string()));
    }

    Ok(Variante::Liste(segments))
}

fn analyser_segment(s: &str, profondeur: usize) -> Result<Variante, ErreurComparaison> {
    if profondeur > MAX_PROFONDEUR {
        return Err(ErreurComparaison::ImbricationExcessive(MAX_PROFONDEUR));
    }

    // 1) marqueur au niveau 0 : coupe au PREMIER
    if let Some((i, len)) = marqueur_niveau0(s) {
        let gauche = analyser_segment(&s[..i], profondeur + 1)?;
        let droite = analyser_segment(&s[i + len..], profondeur + 1)?;
        return Ok(Variante::PlusMoins(Box::new(gauche), Box::new(droite)));
    }

    // 2) marqueur dans un groupe : préfixe + contenu développé + suite
    if let Some((ouv, ferm)) = groupe_avec_marqueur(s) {
        let interieur = analyser_segment(&s[ouv + 1..ferm], profondeur + 1)?;
        let suite = analyser_segment(&s[ferm..], profondeur + 1)?;
        return Ok(Variante::Suite(vec![
            Variante::Litteral(s[..=ouv].to_string()),
            interieur,
            suite,
        ]));
    }

    Ok(Variante::Litteral(s.to_string()))
}

/* ------------------------ Rendu Somme / Difference ------------------------ */

fn combiner(g: &Variante, d: &Variante, signe: char) -> Vec<String> {
    let gauches = g.aplatir();
    let droites = d.aplatir();
    let mut out = Vec::with_capacity(gauches.len() * droites.len());
    for l in &gauches {
        for r in &droites {
            out.push(joindre(l, signe, r));
        }
    }
    out
}

fn joindre(gauche: &str, signe: char, droite: &str) -> String {
    let l = gauche.trim();
    let r = droite.trim();
    let r = if contient_operateur_binaire(r) {
        format!("({r})")
    } else {
        r.to_string()
    };

    match (l.is_empty(), signe) {
        (true, '+') => r,
        (true, _) => format!("{signe}{r}"),
        (false, _) => format!("{l}{signe}{r}"),
    }
}

/// Opérateur binaire = opérateur qui n'est pas en tête (le signe de tête est unaire).
fn contient_operateur_binaire(s: &str) -> bool {
    const OPS: &[char] = &['+', '-', '*', '/', '^', ':', '×', '÷', '·', '⋅', '−'];
    s.chars().skip(1).any(|c| OPS.contains(&c))
        || ["\\cdot", "\\times", "\\div"].iter().any(|cmd| s.contains(cmd))
}

/* ------------------------ Balayage avec profondeur ------------------------ */

fn est_ouvrant(c: char) -> bool {
    matches!(c, '(' | '[' | '{')
}

fn est_fermant(c: char) -> bool {
    matches!(c, ')' | ']' | '}')
}

/// Longueur (octets) d'un marqueur ± commençant en `i`, sinon None.
fn marqueur_en(s: &str, i: usize) -> Option<usize> {
    let reste = &s[i..];
    if reste.starts_with('±') {
        return Some('±'.len_utf8());
    }
    if reste.starts_with("+-") {
        return Some(2);
    }
    if let Some(apres) = reste.strip_prefix("\\pm") {
        // "\pmod" n'est pas un marqueur
        if !apres.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Some(3);
        }
    }
    None
}

pub fn compter_marqueurs(s: &str) -> usize {
    let mut n = 0;
    let mut i = 0;
    while i < s.len() {
        match marqueur_en(s, i) {
            Some(len) => {
                n += 1;
                i += len;
            }
            None => i += s[i..].chars().next().map_or(1, char::len_utf8),
        }
    }
    n
}

fn decouper_niveau0(s: &str, sep: char) -> Vec<&str> {
    let mut out = Vec::new();
    let mut profondeur = 0usize;
    let mut debut = 0;
    for (i, c) in s.char_indices() {
        if est_ouvrant(c) {
            profondeur += 1;
        } else if est_fermant(c) {
            profondeur = profondeur.saturating_sub(1);
        } else if c == sep && profondeur == 0 {
            out.push(&s[debut..i]);
            debut = i + c.len_utf8();
        }
    }
    out.push(&s[debut..]);
    out
}

fn marqueur_niveau0(s: &str) -> Option<(usize, usize)> {
    let mut profondeur = 0usize;
    for (i, c) in s.char_indices() {
        if est_ouvrant(c) {
            profondeur += 1;
        } else if est_fermant(c) {
            profondeur = profondeur.saturating_sub(1);
        } else if profondeur == 0 {
            if let Some(len) = marqueur_en(s, i) {
                return Some((i, len));
            }
        }
    }
    None
}

/// Premier groupe de niveau 0 contenant un marqueur : (ouvrant, fermant).
/// Groupe non fermé => fermant = s.len().
fn groupe_avec_marqueur(s: &str) -> Option<(usize, usize)> {
    let mut profondeur = 0usize;
    let mut ouvrant = 0usize;
    for (i, c) in s.char_indices() {
        if est_ouvrant(c) {
            if profondeur == 0 {
                ouvrant = i;
            }
            profondeur += 1;
        } else if est_fermant(c) && profondeur > 0 {
            profondeur -= 1;
            if profondeur == 0 && compter_marqueurs(&s[ouvrant + 1..i]) > 0 {
                return Some((ouvrant, i));
            }
        }
    }
    if profondeur > 0 && compter_marqueurs(&s[ouvrant + 1..]) > 0 {
        return Some((ouvrant, s.len()));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branches(s: &str) -> Vec<String> {
        developper(s).unwrap_or_else(|e| panic!("developper({s:?}): {e}"))
    }

    #[test]
    fn liste_simple() {
        assert_eq!(branches("2; 5"), vec!["2", "5"]);
        assert_eq!(branches(" 2 ;; 5 ; "), vec!["2", "5"]);
    }

    #[test]
    fn plus_moins_tete() {
        assert_eq!(branches("±5"), vec!["5", "-5"]);
        assert_eq!(branches("+-5"), vec!["5", "-5"]);
        assert_eq!(branches("\\pm 5"), vec!["5", "-5"]);
    }

    #[test]
    fn plus_moins_binaire() {
        assert_eq!(branches("2 ± 3"), vec!["2+3", "2-3"]);
        assert_eq!(branches("2 ± 3*4"), vec!["2+(3*4)", "2-(3*4)"]);
        assert_eq!(branches("1 ± -3"), vec!["1+-3", "1--3"]);
    }

    #[test]
    fn plus_moins_imbrique_dans_groupe() {
        let b = branches("\\frac{-4 \\pm \\sqrt{16}}{2}");
        assert_eq!(
            b,
            vec!["\\frac{-4+\\sqrt{16}}{2}", "\\frac{-4-\\sqrt{16}}{2}"]
        );
    }

    #[test]
    fn point_virgule_dans_parentheses_ne_coupe_pas() {
        assert_eq!(branches("(1;2); 3"), vec!["(1;2)", "3"]);
    }

    #[test]
    fn deux_puissance_k() {
        for k in 0..8 {
            let s = (0..k).fold("1".to_string(), |acc, i| format!("{acc} ± {}", i + 2));
            assert_eq!(branches(&s).len(), 1 << k, "s={s:?}");
        }
        // k marqueurs répartis : 2 + 4 = 6
        assert_eq!(branches("±1; 1 ± (2 ± 3)").len(), 6);
    }

    #[test]
    fn plus_moins_successifs_valeurs() {
        let mut b = branches("1 ± 2 ± 3");
        b.sort();
        assert_eq!(b, vec!["1+(2+3)", "1+(2-3)", "1-(2+3)", "1-(2-3)"]);
    }

    #[test]
    fn jamais_zero_branche_si_non_vide() {
        assert_eq!(branches(";;"), vec![";;"]);
        assert_eq!(branches("   "), vec![""]);
        assert_eq!(branches(" ; ; "), vec![";;"]);
        assert!(branches("").is_empty());
    }

    #[test]
    fn pmod_n_est_pas_un_marqueur() {
        assert_eq!(branches("\\pmod{3}"), vec!["\\pmod{3}"]);
    }

    #[test]
    fn explosion_bornee() {
        let s = "±1".repeat(20);
        assert!(matches!(
            developper(&s),
            Err(ErreurComparaison::TropDeVariantes(_))
        ));
    }

    #[test]
    fn imbrication_bornee() {
        let s = format!("{}±1{}", "(".repeat(500), ")".repeat(500));
        assert!(matches!(
            developper(&s),
            Err(ErreurComparaison::ImbricationExcessive(_))
        ));
    }
}
