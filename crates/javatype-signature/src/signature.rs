use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    fn from_tag(tag: u8) -> Option<BaseType> {
        Some(match tag {
            b'B' => BaseType::Byte,
            b'C' => BaseType::Char,
            b'D' => BaseType::Double,
            b'F' => BaseType::Float,
            b'I' => BaseType::Int,
            b'J' => BaseType::Long,
            b'S' => BaseType::Short,
            b'Z' => BaseType::Boolean,
            _ => return None,
        })
    }

    /// The Java source keyword for this primitive.
    pub fn java_name(self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    Base(BaseType),
    Class(ClassTypeSignature),
    TypeVariable(String),
    Array(Box<TypeSignature>),
}

/// One dotted segment of a class type: a simple name plus its own type
/// arguments (`Outer<TT;>.Inner<TT;>` has two segments).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTypeSegment {
    pub name: String,
    pub type_arguments: Vec<TypeArgument>,
}

/// A possibly nested, possibly parameterized class reference.
///
/// The first segment keeps its package prefix in internal form
/// (`java/util/Map`); nested segments are simple names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTypeSignature {
    pub segments: Vec<ClassTypeSegment>,
}

impl ClassTypeSignature {
    /// Dotted binary name, with nested segments joined by `$`:
    /// `java/util/Map` + `Entry` becomes `java.util.Map$Entry`.
    pub fn binary_name(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push('$');
            }
            out.push_str(&segment.name);
        }
        out.replace('/', ".")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArgument {
    /// `*`, the unbounded wildcard.
    Any,
    Exact(TypeSignature),
    /// `+`, an upper-bounded wildcard.
    Extends(TypeSignature),
    /// `-`, a lower-bounded wildcard.
    Super(TypeSignature),
}

/// A declared type parameter with its bounds. The class bound slot is
/// `None` when the declaration leaves it empty (`T::Ljava/lang/Comparable...`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: String,
    pub class_bound: Option<TypeSignature>,
    pub interface_bounds: Vec<TypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub super_class: ClassTypeSignature,
    pub interfaces: Vec<ClassTypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnType {
    Void,
    Type(TypeSignature),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<TypeSignature>,
    pub return_type: ReturnType,
    pub throws: Vec<TypeSignature>,
}

/// Parse a field signature. Erased field descriptors are accepted too,
/// so `I` and `[Ljava/lang/String;` parse the same way their generic
/// counterparts do.
pub fn parse_field_signature(sig: &str) -> Result<TypeSignature> {
    let mut cursor = Cursor::new(sig);
    let ty = type_signature(&mut cursor)?;
    cursor.finish()?;
    Ok(ty)
}

pub fn parse_class_signature(sig: &str) -> Result<ClassSignature> {
    let mut cursor = Cursor::new(sig);
    let type_parameters = if cursor.peek() == Some(b'<') {
        type_parameters(&mut cursor)?
    } else {
        Vec::new()
    };
    let super_class = class_type(&mut cursor)?;
    let mut interfaces = Vec::new();
    while !cursor.at_end() {
        interfaces.push(class_type(&mut cursor)?);
    }
    Ok(ClassSignature {
        type_parameters,
        super_class,
        interfaces,
    })
}

pub fn parse_method_signature(sig: &str) -> Result<MethodSignature> {
    let mut cursor = Cursor::new(sig);
    let type_parameters = if cursor.peek() == Some(b'<') {
        type_parameters(&mut cursor)?
    } else {
        Vec::new()
    };

    cursor.expect(b'(')?;
    let mut parameters = Vec::new();
    while !cursor.eat(b')') {
        if cursor.at_end() {
            return Err(Error::UnexpectedEof);
        }
        parameters.push(type_signature(&mut cursor)?);
    }

    let return_type = if cursor.eat(b'V') {
        ReturnType::Void
    } else {
        ReturnType::Type(type_signature(&mut cursor)?)
    };

    let mut throws = Vec::new();
    while cursor.eat(b'^') {
        let thrown = match cursor.peek() {
            Some(b'L') => TypeSignature::Class(class_type(&mut cursor)?),
            Some(b'T') => type_variable(&mut cursor)?,
            Some(_) => return Err(cursor.malformed()),
            None => return Err(Error::UnexpectedEof),
        };
        throws.push(thrown);
    }

    cursor.finish()?;
    Ok(MethodSignature {
        type_parameters,
        parameters,
        return_type,
        throws,
    })
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Cursor { src, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) -> Result<u8> {
        let b = self.peek().ok_or(Error::UnexpectedEof)?;
        self.pos += 1;
        Ok(b)
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, b: u8) -> Result<()> {
        match self.peek() {
            Some(found) if found == b => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(self.malformed()),
            None => Err(Error::UnexpectedEof),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn finish(&self) -> Result<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(Error::TrailingInput(self.src[self.pos..].to_string()))
        }
    }

    fn malformed(&self) -> Error {
        Error::InvalidSignature(self.src.to_string())
    }

    /// A nonempty run of bytes, stopped by `stop`. Stop bytes are always
    /// ASCII, so the run ends on a character boundary.
    fn take_until(&mut self, stop: impl Fn(u8) -> bool) -> Result<&'a str> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if stop(b) {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.malformed());
        }
        Ok(&self.src[start..self.pos])
    }
}

fn type_signature(cursor: &mut Cursor) -> Result<TypeSignature> {
    match cursor.peek() {
        Some(b'L') => Ok(TypeSignature::Class(class_type(cursor)?)),
        Some(b'T') => type_variable(cursor),
        Some(b'[') => {
            cursor.bump()?;
            Ok(TypeSignature::Array(Box::new(type_signature(cursor)?)))
        }
        Some(tag) => match BaseType::from_tag(tag) {
            Some(base) => {
                cursor.bump()?;
                Ok(TypeSignature::Base(base))
            }
            None => Err(cursor.malformed()),
        },
        None => Err(Error::UnexpectedEof),
    }
}

// Bound and type-argument positions admit reference types only.
fn reference_type(cursor: &mut Cursor) -> Result<TypeSignature> {
    match cursor.peek() {
        Some(b'L') | Some(b'T') | Some(b'[') => type_signature(cursor),
        Some(_) => Err(cursor.malformed()),
        None => Err(Error::UnexpectedEof),
    }
}

fn type_variable(cursor: &mut Cursor) -> Result<TypeSignature> {
    cursor.expect(b'T')?;
    let name = cursor.take_until(|b| b == b';')?.to_string();
    cursor.expect(b';')?;
    Ok(TypeSignature::TypeVariable(name))
}

fn class_type(cursor: &mut Cursor) -> Result<ClassTypeSignature> {
    cursor.expect(b'L')?;
    let mut segments = Vec::new();
    loop {
        let name = cursor
            .take_until(|b| matches!(b, b';' | b'<' | b'.'))?
            .to_string();
        let type_arguments = if cursor.eat(b'<') {
            let mut args = Vec::new();
            while !cursor.eat(b'>') {
                if cursor.at_end() {
                    return Err(Error::UnexpectedEof);
                }
                args.push(type_argument(cursor)?);
            }
            args
        } else {
            Vec::new()
        };
        segments.push(ClassTypeSegment {
            name,
            type_arguments,
        });
        match cursor.bump()? {
            b'.' => {}
            b';' => break,
            _ => return Err(cursor.malformed()),
        }
    }
    Ok(ClassTypeSignature { segments })
}

fn type_argument(cursor: &mut Cursor) -> Result<TypeArgument> {
    match cursor.peek() {
        Some(b'*') => {
            cursor.bump()?;
            Ok(TypeArgument::Any)
        }
        Some(b'+') => {
            cursor.bump()?;
            Ok(TypeArgument::Extends(reference_type(cursor)?))
        }
        Some(b'-') => {
            cursor.bump()?;
            Ok(TypeArgument::Super(reference_type(cursor)?))
        }
        Some(_) => Ok(TypeArgument::Exact(reference_type(cursor)?)),
        None => Err(Error::UnexpectedEof),
    }
}

fn type_parameters(cursor: &mut Cursor) -> Result<Vec<TypeParameter>> {
    cursor.expect(b'<')?;
    let mut params = Vec::new();
    loop {
        let name = cursor.take_until(|b| b == b':')?.to_string();
        cursor.expect(b':')?;
        let class_bound = if cursor.peek() == Some(b':') {
            None
        } else {
            Some(reference_type(cursor)?)
        };
        let mut interface_bounds = Vec::new();
        while cursor.eat(b':') {
            interface_bounds.push(reference_type(cursor)?);
        }
        params.push(TypeParameter {
            name,
            class_bound,
            interface_bounds,
        });
        if cursor.eat(b'>') {
            break;
        }
        if cursor.at_end() {
            return Err(Error::UnexpectedEof);
        }
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn class(name: &str, type_arguments: Vec<TypeArgument>) -> ClassTypeSignature {
        ClassTypeSignature {
            segments: vec![ClassTypeSegment {
                name: name.to_string(),
                type_arguments,
            }],
        }
    }

    #[test]
    fn parse_field_signature_descriptor_forms() {
        assert_eq!(
            parse_field_signature("I").unwrap(),
            TypeSignature::Base(BaseType::Int)
        );
        assert_eq!(
            parse_field_signature("[[Ljava/lang/String;").unwrap(),
            TypeSignature::Array(Box::new(TypeSignature::Array(Box::new(
                TypeSignature::Class(class("java/lang/String", vec![]))
            ))))
        );
    }

    #[test]
    fn parse_field_signature_generic_forms() {
        assert_eq!(
            parse_field_signature("Ljava/util/List<Ljava/lang/String;>;").unwrap(),
            TypeSignature::Class(class(
                "java/util/List",
                vec![TypeArgument::Exact(TypeSignature::Class(class(
                    "java/lang/String",
                    vec![]
                )))]
            ))
        );
        assert_eq!(
            parse_field_signature("[TT;").unwrap(),
            TypeSignature::Array(Box::new(TypeSignature::TypeVariable("T".to_string())))
        );
    }

    #[test]
    fn parse_field_signature_wildcards() {
        let sig = parse_field_signature(
            "Ljava/util/Map<*+Ljava/lang/Number;-Ljava/lang/Integer;>;",
        )
        .unwrap();
        let TypeSignature::Class(class_sig) = sig else {
            panic!("expected a class type");
        };
        assert_eq!(
            class_sig.segments[0].type_arguments,
            vec![
                TypeArgument::Any,
                TypeArgument::Extends(TypeSignature::Class(class("java/lang/Number", vec![]))),
                TypeArgument::Super(TypeSignature::Class(class("java/lang/Integer", vec![]))),
            ]
        );
    }

    #[test]
    fn nested_segments_produce_dollar_joined_binary_names() {
        let sig = parse_field_signature("Lcom/example/Outer<TT;>.Inner<TT;>;").unwrap();
        let TypeSignature::Class(class_sig) = sig else {
            panic!("expected a class type");
        };
        assert_eq!(class_sig.segments.len(), 2);
        assert_eq!(class_sig.segments[1].name, "Inner");
        assert_eq!(class_sig.binary_name(), "com.example.Outer$Inner");
    }

    #[test]
    fn parse_class_signature_with_parameters_and_interfaces() {
        let sig = parse_class_signature(
            "<E:Ljava/lang/Object;>Ljava/util/AbstractList<TE;>;Ljava/util/List<TE;>;",
        )
        .unwrap();
        assert_eq!(sig.type_parameters.len(), 1);
        assert_eq!(sig.type_parameters[0].name, "E");
        assert_eq!(
            sig.type_parameters[0].class_bound,
            Some(TypeSignature::Class(class("java/lang/Object", vec![])))
        );
        assert_eq!(sig.super_class.binary_name(), "java.util.AbstractList");
        assert_eq!(sig.interfaces.len(), 1);
        assert_eq!(sig.interfaces[0].binary_name(), "java.util.List");
    }

    #[test]
    fn empty_class_bound_leaves_the_slot_open() {
        let sig =
            parse_class_signature("<T::Ljava/lang/Comparable<TT;>;>Ljava/lang/Object;").unwrap();
        let param = &sig.type_parameters[0];
        assert_eq!(param.class_bound, None);
        assert_eq!(
            param.interface_bounds,
            vec![TypeSignature::Class(class(
                "java/lang/Comparable",
                vec![TypeArgument::Exact(TypeSignature::TypeVariable(
                    "T".to_string()
                ))]
            ))]
        );
    }

    #[test]
    fn parse_method_signature_full_shape() {
        let sig = parse_method_signature(
            "<T:Ljava/lang/Object;>(TT;Ljava/util/List<TT;>;)TT;^Ljava/io/IOException;",
        )
        .unwrap();
        assert_eq!(sig.type_parameters.len(), 1);
        assert_eq!(
            sig.parameters,
            vec![
                TypeSignature::TypeVariable("T".to_string()),
                TypeSignature::Class(class(
                    "java/util/List",
                    vec![TypeArgument::Exact(TypeSignature::TypeVariable(
                        "T".to_string()
                    ))]
                )),
            ]
        );
        assert_eq!(
            sig.return_type,
            ReturnType::Type(TypeSignature::TypeVariable("T".to_string()))
        );
        assert_eq!(
            sig.throws,
            vec![TypeSignature::Class(class("java/io/IOException", vec![]))]
        );
    }

    #[test]
    fn void_return_is_distinct_from_types() {
        let sig = parse_method_signature("(I)V").unwrap();
        assert_eq!(sig.return_type, ReturnType::Void);
        assert!(sig.type_parameters.is_empty());
        assert_eq!(sig.parameters, vec![TypeSignature::Base(BaseType::Int)]);
    }

    #[test]
    fn truncated_and_trailing_input_are_rejected() {
        assert!(matches!(
            parse_field_signature("Ljava/util/List<"),
            Err(Error::UnexpectedEof)
        ));
        assert!(matches!(
            parse_field_signature("Ljava/lang/String"),
            Err(Error::UnexpectedEof)
        ));
        assert!(matches!(
            parse_field_signature("IV"),
            Err(Error::TrailingInput(rest)) if rest == "V"
        ));
        assert!(matches!(
            parse_method_signature("(I"),
            Err(Error::UnexpectedEof)
        ));
        assert!(parse_field_signature("Q").is_err());
        assert!(parse_field_signature("").is_err());
    }
}
