//! Example run of the metadata generator over a hand-built document.
//!
//! Run with: `cargo run --example generate`
//!
//! The document corresponds to this IDL:
//!
//! ```idl
//! module Bank {
//!     enum AccountKind { checking, savings };
//!     exception InsufficientFunds { long missing; };
//!     struct Entry { string label; long long amount; };
//!     interface Account {
//!         readonly attribute long long balance;
//!         void withdraw(in long long amount);
//!     };
//! };
//! ```

use idlcls::ast::{
    AttrDcl, Declarator, Definition, EnumDcl, ExceptDcl, Export, InterfaceDcl, Member, ModuleDcl,
    OpDcl, ParamDcl, Specification, StructDcl, SymbolTable, TypeDcl, TypeSpec,
};
use idlcls::codegen::{CustomMappingTable, MetadataGenerator};
use idlcls::core::ParamDirection;

fn bank_document() -> Specification {
    let definitions = vec![
        Definition::Type(TypeDcl::Enum(EnumDcl {
            name: "AccountKind".to_string(),
            enumerators: vec!["checking".to_string(), "savings".to_string()],
        })),
        Definition::Except(ExceptDcl {
            name: "InsufficientFunds".to_string(),
            members: vec![Member {
                ty: TypeSpec::Long,
                declarators: vec![Declarator::Simple("missing".to_string())],
            }],
        }),
        Definition::Type(TypeDcl::Struct(StructDcl {
            name: "Entry".to_string(),
            members: vec![
                Member {
                    ty: TypeSpec::String,
                    declarators: vec![Declarator::Simple("label".to_string())],
                },
                Member {
                    ty: TypeSpec::LongLong,
                    declarators: vec![Declarator::Simple("amount".to_string())],
                },
            ],
        })),
        Definition::Interface(InterfaceDcl {
            name: "Account".to_string(),
            is_abstract: false,
            is_local: false,
            inherits: Vec::new(),
            body: vec![
                Export::Attr(AttrDcl {
                    read_only: true,
                    ty: TypeSpec::LongLong,
                    names: vec!["balance".to_string()],
                }),
                Export::Op(OpDcl {
                    name: "withdraw".to_string(),
                    return_ty: None,
                    params: vec![ParamDcl {
                        direction: ParamDirection::In,
                        ty: TypeSpec::LongLong,
                        name: "amount".to_string(),
                    }],
                    raises: Vec::new(),
                }),
            ],
        }),
    ];
    Specification {
        definitions: vec![Definition::Module(ModuleDcl {
            name: "Bank".to_string(),
            definitions,
        })],
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut generator = MetadataGenerator::new("Bank", &[], CustomMappingTable::new())?;
    let mut table = SymbolTable::new();
    generator.generate(&bank_document(), &mut table)?;
    let (module, impls_needed) = generator.finish()?;

    println!("Generated {} types into '{}'", module.generated_count(), module.name());
    for (_, shape) in module.iter() {
        println!("  {:?} {}", shape.kind, shape.name);
        for field in &shape.fields {
            println!("    field {}", field.name);
        }
        for method in &shape.methods {
            println!("    method {} ({} params)", method.name, method.params.len());
        }
        for property in &shape.properties {
            println!("    property {}", property.name);
        }
    }
    if !impls_needed.is_empty() {
        println!("Implementation classes needed for: {}", impls_needed.join(", "));
    }
    Ok(())
}
