// src/noyau/normalise.rs
//
// Normalisation : notation brute (Unicode, LaTeX, glyphes) -> chaîne canonique
// lisible par l'évaluateur (opérateurs ASCII, constantes nommées, appels de fonctions).
//
// Trois passes, dans cet ordre (l'ordre compte) :
// 1) réécriture  : balayage récursif qui connaît les groupes {…}, (…), |…|
//                  (les mots sont lus AVANT la suppression des espaces)
// 2) compactage  : suppression des espaces
// 3) multiplication implicite : 2x -> 2*x, 2( -> 2*(, )2 -> )*2, )( -> )*(
//
// Totale : ne panique pas, renvoie toujours une chaîne (l'échec éventuel est
// laissé à l'évaluateur).

/// Marqueur “pas de solution” : l'évaluateur le refuse explicitement.
pub const SENTINELLE_VIDE: &str = "EmptySet";

/// Au-delà, le reste est recopié tel quel.
const MAX_PROFONDEUR: usize = 128;

/// Phrases qui signifient “pas de solution” n'importe où dans la branche.
const PHRASES_SANS_SOLUTION: &[&str] = &[
    "нет решений",
    "нет решения",
    "нет корней",
    "решений нет",
    "корней нет",
    "пустое множество",
    "шешімі жоқ",
    "no solution",
    "no real solution",
    "empty set",
];

/// Réponses complètes qui signifient “pas de solution”.
const REPONSES_SANS_SOLUTION: &[&str] = &["нет", "none", "ø"];

const FONCTIONS_TRIG: &[&str] = &[
    "sin", "cos", "tan", "sec", "csc", "cot", "sinh", "cosh", "tanh", "sech", "csch", "coth",
];

pub fn normaliser(branche: &str) -> String {
    let s = branche.trim().to_lowercase();
    if s.is_empty() {
        return String::new();
    }

    let tasse = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if REPONSES_SANS_SOLUTION.contains(&tasse.as_str())
        || PHRASES_SANS_SOLUTION.iter().any(|p| tasse.contains(p))
    {
        return SENTINELLE_VIDE.to_string();
    }

    let mut lecteur = Lecteur {
        c: s.chars().collect(),
        i: 0,
    };
    let reecrit = lecteur.sequence(Arret::Fin, false, 0);

    let compact: String = reecrit.chars().filter(|c| !c.is_whitespace()).collect();
    multiplication_implicite(&compact)
}

/* ------------------------ Passe 1 : réécriture ------------------------ */

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Arret {
    Fin,
    Car(char),
    /// Fermeture d'une valeur absolue.
    Barre,
}

struct Lecteur {
    c: Vec<char>,
    i: usize,
}

impl Lecteur {
    fn peek(&self) -> Option<char> {
        self.c.get(self.i).copied()
    }

    fn suit(&self, motif: &str) -> bool {
        motif
            .chars()
            .enumerate()
            .all(|(k, m)| self.c.get(self.i + k) == Some(&m))
    }

    /// "\nom" non suivi d'une lettre ; renvoie la longueur en caractères.
    fn suit_commande(&self, nom: &str) -> Option<usize> {
        self.commande_en(self.i, nom)
    }

    fn commande_en(&self, pos: usize, nom: &str) -> Option<usize> {
        let n = nom.chars().count() + 1;
        let ok = self.c.get(pos) == Some(&'\\')
            && nom
                .chars()
                .enumerate()
                .all(|(k, m)| self.c.get(pos + 1 + k) == Some(&m))
            && !self
                .c
                .get(pos + n)
                .is_some_and(|c| c.is_ascii_alphabetic());
        ok.then_some(n)
    }

    fn sauter_espaces(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.i += 1;
        }
    }

    fn prochain_significatif(&self) -> Option<char> {
        self.c[self.i.min(self.c.len())..]
            .iter()
            .copied()
            .find(|c| !c.is_whitespace())
    }

    fn reste_brut(&mut self) -> String {
        let s: String = self.c[self.i.min(self.c.len())..].iter().collect();
        self.i = self.c.len();
        s
    }

    /// Boucle principale : lit jusqu'à `arret` (consommé) ou la fin.
    /// `args` : une virgule de niveau 0 sépare des arguments.
    fn sequence(&mut self, arret: Arret, args: bool, prof: usize) -> String {
        if prof > MAX_PROFONDEUR {
            return self.reste_brut();
        }

        let mut out = String::new();
        let mut parens = 0usize;
        let mut crochets = 0usize;

        while let Some(c) = self.peek() {
            match arret {
                Arret::Car(f)
                    if c == f
                        && (f != ')' || parens == 0)
                        && (f != ']' || crochets == 0) =>
                {
                    self.i += 1;
                    return out;
                }
                Arret::Barre => {
                    if let Some(n) = self.fermeture_abs(&out) {
                        self.i += n;
                        return out;
                    }
                }
                _ => {}
            }

            if let Some(n) = self.ouverture_abs() {
                self.i += n;
                let x = self.sequence(Arret::Barre, false, prof + 1);
                out.push_str(&format!("abs({x})"));
                continue;
            }

            self.i += 1;
            match c {
                '\\' => {
                    let s = self.commande(prof);
                    out.push_str(&s);
                }
                '{' => {
                    let x = self.sequence(Arret::Car('}'), false, prof + 1);
                    out.push_str(&format!("({x})"));
                }
                '}' => out.push(')'),
                '(' => {
                    parens += 1;
                    out.push('(');
                }
                ')' => {
                    parens = parens.saturating_sub(1);
                    out.push(')');
                }
                '[' => {
                    crochets += 1;
                    out.push('[');
                }
                ']' => {
                    crochets = crochets.saturating_sub(1);
                    out.push(']');
                }
                ',' => {
                    let sep = args && parens == 0 && crochets == 0;
                    out.push(self.virgule(sep));
                }
                '^' => out.push_str(self.exposant()),
                '°' => out.push_str("deg"),
                '√' => {
                    // √[n]{x}
                    if self.prochain_significatif() == Some('[') {
                        self.sauter_espaces();
                        self.i += 1;
                        let n = self.sequence(Arret::Car(']'), false, prof + 1);
                        let r = self.radicande(prof);
                        if n.trim().is_empty() {
                            out.push_str(&format!("sqrt({r})"));
                        } else {
                            out.push_str(&format!("nthRoot({r},{n})"));
                        }
                    } else {
                        let r = self.radicande(prof);
                        out.push_str(&format!("sqrt({r})"));
                    }
                }
                '∛' => {
                    let r = self.radicande(prof);
                    out.push_str(&format!("nthRoot({r},3)"));
                }
                '∜' => {
                    let r = self.radicande(prof);
                    out.push_str(&format!("nthRoot({r},4)"));
                }
                'π' => out.push_str("pi"),
                '∞' => out.push_str("Infinity"),
                '∅' => out.push_str(SENTINELLE_VIDE),
                '×' | '⋅' | '·' | '∙' | '∗' => out.push('*'),
                ':' | '÷' => out.push('/'),
                '−' | '–' | '—' => out.push('-'),
                '≤' => out.push_str("<="),
                '≥' => out.push_str(">="),
                '≠' => out.push_str("!="),
                c if exposant_unicode(c).is_some() => {
                    self.i -= 1;
                    let s = self.exposants_unicode(prof);
                    out.push_str(&s);
                }
                c if c.is_alphabetic() => {
                    self.i -= 1;
                    let mot = self.lire_mot();
                    let s = self.mot(&mot, false, prof);
                    out.push_str(&s);
                }
                c if c.is_whitespace() => out.push(' '),
                c => out.push(c),
            }
        }

        out
    }

    /* ---------- valeur absolue ---------- */

    fn ouverture_abs(&self) -> Option<usize> {
        for motif in ["\\left|", "\\left\\|"] {
            if self.suit(motif) {
                return Some(motif.chars().count());
            }
        }
        // "\left\vert" / "\left\lvert"
        if let Some(n) = self.suit_commande("left") {
            for nom in ["vert", "lvert"] {
                if let Some(m) = self.commande_en(self.i + n, nom) {
                    return Some(n + m);
                }
            }
        }
        if let Some(n) = self.suit_commande("lvert") {
            return Some(n);
        }
        if self.suit("|") {
            return Some(1);
        }
        self.suit_commande("vert")
    }

    fn fermeture_abs(&self, out: &str) -> Option<usize> {
        for motif in ["\\right|", "\\right\\|", "\\right\\vert", "\\right\\rvert"] {
            if self.suit(motif) {
                return Some(motif.chars().count());
            }
        }
        if let Some(n) = self.suit_commande("rvert") {
            return Some(n);
        }
        if !position_valeur(out) {
            return None;
        }
        if self.suit("|") {
            return Some(1);
        }
        self.suit_commande("vert")
    }

    /* ---------- petits lecteurs ---------- */

    fn lire_mot(&mut self) -> String {
        let debut = self.i;
        while self.peek().is_some_and(char::is_alphabetic) {
            self.i += 1;
        }
        self.c[debut..self.i].iter().collect()
    }

    /// Chiffres, points, virgules décimales (entre deux chiffres).
    fn nombre(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                out.push(c);
                self.i += 1;
            } else if c == ',' && self.virgule_decimale(self.i) {
                out.push('.');
                self.i += 1;
                self.sauter_espaces();
            } else {
                break;
            }
        }
        out
    }

    /// Chiffre avant, chiffre après (espaces tolérés après : "3, 5").
    fn virgule_decimale(&self, pos: usize) -> bool {
        pos > 0
            && self.c.get(pos - 1).is_some_and(char::is_ascii_digit)
            && self.c[(pos + 1).min(self.c.len())..]
                .iter()
                .find(|c| !c.is_whitespace())
                .is_some_and(char::is_ascii_digit)
    }

    /// Appelé après consommation de la virgule.
    fn virgule(&self, separateur: bool) -> char {
        if !separateur && self.virgule_decimale(self.i - 1) {
            '.'
        } else {
            ','
        }
    }

    /// Après '^' : "^\circ" / "^{\circ}" => degré ; sinon '^'.
    fn exposant(&mut self) -> &'static str {
        self.sauter_espaces();
        if let Some(n) = self.suit_commande("circ") {
            self.i += n;
            return "deg";
        }
        if self.suit("{\\circ}") {
            self.i += 7;
            return "deg";
        }
        "^"
    }

    /// ²³ … ; suivi de √ => racine n-ième.
    fn exposants_unicode(&mut self, prof: usize) -> String {
        let mut chiffres = String::new();
        while let Some(d) = self.peek().and_then(exposant_unicode) {
            chiffres.push(d);
            self.i += 1;
        }
        if self.peek() == Some('√') {
            self.i += 1;
            let r = self.radicande(prof);
            return format!("nthRoot({r},{chiffres})");
        }
        format!("^{chiffres}")
    }

    /// Argument “collé” d'une racine ou d'une fonction : (…), {…}, \cmd, nombre, mot.
    fn radicande(&mut self, prof: usize) -> String {
        if prof > MAX_PROFONDEUR {
            return self.reste_brut();
        }
        self.sauter_espaces();
        if let Some(n) = self.suit_commande("left") {
            self.i += n;
        }
        match self.peek() {
            Some('(') => {
                self.i += 1;
                self.sequence(Arret::Car(')'), false, prof + 1)
            }
            Some('{') => {
                self.i += 1;
                self.sequence(Arret::Car('}'), false, prof + 1)
            }
            Some('\\') => {
                self.i += 1;
                self.commande(prof + 1)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.nombre(),
            Some(c) if c.is_alphabetic() => {
                let m = self.lire_mot();
                self.mot(&m, false, prof + 1)
            }
            _ => String::new(),
        }
    }

    /// Argument LaTeX : {…}, \cmd ou un seul caractère (\frac12).
    fn argument_latex(&mut self, prof: usize) -> String {
        if prof > MAX_PROFONDEUR {
            return self.reste_brut();
        }
        self.sauter_espaces();
        match self.peek() {
            Some('{') => {
                self.i += 1;
                self.sequence(Arret::Car('}'), false, prof + 1)
            }
            Some('\\') => {
                self.i += 1;
                self.commande(prof + 1)
            }
            Some(c) => {
                self.i += 1;
                c.to_string()
            }
            None => String::new(),
        }
    }

    /// "sin 30°" / "lg100" / "\cos\pi" / "\ln e" : argument nu => parenthèses explicites.
    /// Lu avant la suppression des espaces, sinon "\sin x" deviendrait "sinx".
    fn argument_nu(&mut self, prof: usize) -> String {
        let save = self.i;
        self.sauter_espaces();
        if let Some(n) = self.ouverture_abs() {
            self.i += n;
            let x = self.sequence(Arret::Barre, false, prof + 1);
            return format!("(abs({x}))");
        }
        self.i = save;

        match self.prochain_significatif() {
            Some(c) if c.is_ascii_digit() => {}
            Some(c) if c.is_alphabetic() || c == '\\' => {
                let save = self.i;
                let a = self.radicande(prof + 1);
                if a.trim().is_empty() {
                    self.i = save;
                    return String::new();
                }
                return format!("({a})");
            }
            _ => return String::new(),
        }
        self.sauter_espaces();
        let n = self.nombre();
        let deg = if self.peek() == Some('°') {
            self.i += 1;
            "deg"
        } else if self.suit("^") {
            let save = self.i;
            self.i += 1;
            let e = self.exposant();
            if e == "deg" {
                "deg"
            } else {
                self.i = save;
                ""
            }
        } else {
            ""
        };
        format!("({n}{deg})")
    }

    /// Le groupe (…) qui suit contient-il une virgule de niveau 0 ?
    fn groupe_a_virgule(&self) -> bool {
        let mut k = self.i;
        while self.c.get(k).is_some_and(|c| c.is_whitespace()) {
            k += 1;
        }
        if self.c.get(k) != Some(&'(') {
            return false;
        }
        let mut profondeur = 0usize;
        for &c in &self.c[k..] {
            match c {
                '(' | '[' | '{' => profondeur += 1,
                ')' | ']' | '}' => {
                    profondeur = profondeur.saturating_sub(1);
                    if profondeur == 0 {
                        return false;
                    }
                }
                ',' if profondeur == 1 => return true,
                _ => {}
            }
        }
        false
    }

    /* ---------- mots et commandes ---------- */

    fn mot(&mut self, mot: &str, commande: bool, prof: usize) -> String {
        let canon = nom_canonique(mot, commande);
        match canon.as_str() {
            "sqrt" => {
                if self
                    .prochain_significatif()
                    .is_some_and(|c| c.is_ascii_digit() || matches!(c, '(' | '{' | '\\' | '.'))
                {
                    let r = self.radicande(prof);
                    format!("sqrt({r})")
                } else {
                    canon
                }
            }
            "nthRoot" => {
                if self.prochain_significatif() == Some('(') {
                    self.sauter_espaces();
                    self.i += 1;
                    let x = self.sequence(Arret::Car(')'), true, prof + 1);
                    format!("nthRoot({x})")
                } else {
                    canon
                }
            }
            "log" => self.logarithme(prof),
            "log_natural" | "log10" | "log2" | "exp" => {
                let a = self.argument_nu(prof);
                format!("{canon}{a}")
            }
            f if est_fonction_trig(f) => {
                let a = self.argument_nu(prof);
                format!("{canon}{a}")
            }
            _ => canon,
        }
    }

    /// Après "log" : log_b(x), log_{b}(x), log2(x), log10(x), log(x, b), log(x).
    fn logarithme(&mut self, prof: usize) -> String {
        if self.peek().is_some_and(|c| c.is_ascii_digit()) {
            let save = self.i;
            let chiffres = self.nombre();
            let suit_groupe = matches!(self.prochain_significatif(), Some('(' | '{'));
            if chiffres == "10" {
                let a = self.argument_nu(prof);
                return format!("log10{a}");
            }
            if suit_groupe {
                let x = self.radicande(prof);
                return format!("log({x},{chiffres})");
            }
            // "log100" : chiffres = argument
            self.i = save;
            let a = self.argument_nu(prof);
            return format!("log10{a}");
        }

        self.sauter_espaces();
        if self.peek() == Some('_') {
            self.i += 1;
            let base = self.argument_latex(prof);
            let x = self.radicande(prof);
            return format!("log({x},{base})");
        }

        if self.groupe_a_virgule() {
            self.sauter_espaces();
            self.i += 1;
            let x = self.sequence(Arret::Car(')'), true, prof + 1);
            return format!("log({x})");
        }

        let a = self.argument_nu(prof);
        format!("log10{a}")
    }

    /// Appelé après '\'.
    fn commande(&mut self, prof: usize) -> String {
        if prof > MAX_PROFONDEUR {
            return self.reste_brut();
        }
        let Some(c) = self.peek() else {
            return String::new();
        };

        if !c.is_ascii_alphabetic() {
            return match c {
                // espacements
                ',' | ';' | '!' | ':' | ' ' => {
                    self.i += 1;
                    String::new()
                }
                '{' => {
                    self.i += 1;
                    "(".into()
                }
                '}' => {
                    self.i += 1;
                    ")".into()
                }
                '%' => {
                    self.i += 1;
                    "%".into()
                }
                // "\|", "\\" … : on laisse le caractère à la boucle
                _ => String::new(),
            };
        }

        let debut = self.i;
        while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.i += 1;
        }
        let nom: String = self.c[debut..self.i].iter().collect();

        match nom.as_str() {
            "frac" | "dfrac" | "tfrac" | "cfrac" => {
                let num = self.argument_latex(prof);
                let den = self.argument_latex(prof);
                format!("(({num})/({den}))")
            }
            "sqrt" => {
                self.sauter_espaces();
                let degre = if self.peek() == Some('[') {
                    self.i += 1;
                    Some(self.sequence(Arret::Car(']'), false, prof + 1))
                } else {
                    None
                };
                let x = self.argument_latex(prof);
                match degre {
                    Some(n) if !n.trim().is_empty() => format!("nthRoot({x},{n})"),
                    _ => format!("sqrt({x})"),
                }
            }
            "left" | "right" | "bigl" | "bigr" | "big" | "bigg" | "biggl" | "biggr" => {
                if self.peek() == Some('.') {
                    self.i += 1;
                    return String::new();
                }
                if self.suit("\\{") {
                    self.i += 2;
                    return "(".into();
                }
                if self.suit("\\}") {
                    self.i += 2;
                    return ")".into();
                }
                String::new()
            }
            "text" | "operatorname" | "mathrm" | "textrm" | "mathit" | "mbox" => {
                self.argument_latex(prof)
            }
            "quad" | "qquad" | "displaystyle" | "lvert" | "rvert" | "vert" => String::new(),
            _ => self.mot(&nom, true, prof),
        }
    }
}

/// Le dernier caractère significatif termine-t-il une valeur ?
fn position_valeur(out: &str) -> bool {
    out.trim_end()
        .chars()
        .last()
        .is_some_and(|c| c.is_alphanumeric() || matches!(c, ')' | ']' | '.' | '!' | '%'))
}

fn exposant_unicode(c: char) -> Option<char> {
    match c {
        '⁰' => Some('0'),
        '¹' => Some('1'),
        '²' => Some('2'),
        '³' => Some('3'),
        '⁴' => Some('4'),
        '⁵' => Some('5'),
        '⁶' => Some('6'),
        '⁷' => Some('7'),
        '⁸' => Some('8'),
        '⁹' => Some('9'),
        _ => None,
    }
}

fn est_fonction_trig(nom: &str) -> bool {
    FONCTIONS_TRIG.contains(&nom)
        || nom
            .strip_prefix('a')
            .is_some_and(|reste| FONCTIONS_TRIG.contains(&reste))
}

/// Alias -> nom canonique. `commande` : le mot venait d'un "\nom".
fn nom_canonique(mot: &str, commande: bool) -> String {
    let canon = match mot {
        "pi" => "pi",
        "infinity" | "inf" | "infty" | "infin" => "Infinity",
        "deg" | "degree" | "degrees" => "deg",
        "ln" => "log_natural",
        "lg" => "log10",
        "tg" => "tan",
        "ctg" | "cotg" | "cotan" => "cot",
        "cosec" => "csc",
        "arctg" => "atan",
        "arcctg" => "acot",
        "nthroot" => "nthRoot",
        "emptyset" | "varnothing" => SENTINELLE_VIDE,
        _ if commande => match mot {
            "circ" | "degree" => "deg",
            "cdot" | "times" | "ast" => "*",
            "div" => "/",
            "pm" => "±",
            "mp" => "∓",
            "leq" | "le" | "leqslant" => "<=",
            "geq" | "ge" | "geqslant" => ">=",
            "neq" | "ne" => "!=",
            "lt" => "<",
            "gt" => ">",
            "approx" => "~",
            m => return arc_vers_a(m),
        },
        m => return arc_vers_a(m),
    };
    canon.to_string()
}

/// arcsin -> asin, arcsinh -> asinh, …
fn arc_vers_a(mot: &str) -> String {
    match mot.strip_prefix("arc") {
        Some(reste) if FONCTIONS_TRIG.contains(&reste) => format!("a{reste}"),
        _ => mot.to_string(),
    }
}

/* ------------------------ Passe 3 : multiplication implicite ------------------------ */

#[derive(Clone, Copy, PartialEq, Eq)]
enum Dernier {
    Rien,
    Nombre,
    Ident,
    Fermante,
    Autre,
}

/// Insère '*' : nombre|')' devant lettre/'(' ; ')' devant chiffre.
/// Les identifiants sont lus d'un bloc (log10( reste intact) ; jamais de '*' devant "deg".
pub fn multiplication_implicite(s: &str) -> String {
    let c: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 8);
    let mut dernier = Dernier::Rien;
    let mut i = 0usize;

    while i < c.len() {
        let ch = c[i];

        if ch.is_ascii_digit() || (ch == '.' && c.get(i + 1).is_some_and(char::is_ascii_digit)) {
            if dernier == Dernier::Fermante {
                out.push('*');
            }
            while i < c.len() && (c[i].is_ascii_digit() || c[i] == '.') {
                out.push(c[i]);
                i += 1;
            }
            dernier = Dernier::Nombre;
            continue;
        }

        if ch.is_alphabetic() || ch == '_' {
            let debut = i;
            while i < c.len() && (c[i].is_alphanumeric() || c[i] == '_') {
                i += 1;
            }
            let ident: String = c[debut..i].iter().collect();
            if matches!(dernier, Dernier::Nombre | Dernier::Fermante) && ident != "deg" {
                out.push('*');
            }
            out.push_str(&ident);
            dernier = Dernier::Ident;
            continue;
        }

        match ch {
            '(' => {
                if matches!(dernier, Dernier::Nombre | Dernier::Fermante) {
                    out.push('*');
                }
                dernier = Dernier::Autre;
            }
            ')' => dernier = Dernier::Fermante,
            _ => dernier = Dernier::Autre,
        }
        out.push(ch);
        i += 1;
    }

    out
}
