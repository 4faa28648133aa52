mod component;
mod markup;

pub use component::DocumentPanel;

/// Document shown until the user edits it.
pub const SEED_DOCUMENT: &str = "\
## Formación de usuarios de la información mediante aplicaciones Web 2.0
Este documento analiza cómo las **TIC** y las **aplicaciones Web 2.0** pueden apoyar la formación de usuarios en la gestión y uso de la información, especialmente en el ámbito educativo.

### Importancia de las TIC
- Son parte esencial de la vida cotidiana (hogar, trabajo, educación).
- Impulsan la educación en línea, a distancia y la teleeducación.
- Exigen habilidades cognitivas, técnicas y actitudinales.

### Formación de usuarios de la información
- Busca dotar de competencias para acceder y usar información eficientemente.
- Implica intercambio de experiencias y aprendizajes continuos.
- Se adapta a comunidades con necesidades específicas.

### Programas de formación
Requieren planificación didáctica clara con objetivos definidos. Sus etapas son:
1. Definición del problema.
2. Análisis del entorno institucional.
3. Diagnóstico de necesidades.
4. Establecer objetivos.
5. Elaborar contenidos.
6. Seleccionar medios didácticos.
7. Producir materiales.
8. Implementar el programa.
9. Evaluar (formativa y sumativa).

### Aplicaciones Web 2.0 y educación
Combinan **tecnología**, **información** y **comunicación**. Permiten crear, almacenar y transmitir información, fomentando la colaboración.
- **Tecnologías de información:** computadoras, software, web, almacenamiento.
- **Tecnologías de comunicación:** internet, telefonía, televisión, radio.

### Ventajas
- Acceso global desde internet.
- Multiplataforma.
- Actualización automática.
- Bajo requerimiento técnico.
- Colaboración remota y simultánea.

### Limitaciones
- Posible acceso de terceros a la información.
- Cambios inesperados en condiciones de uso.
- Riesgo de pérdida de datos (copias de seguridad necesarias).

### Conclusión
La integración de **aplicaciones Web 2.0** en programas de formación mejora la **gestión de la información**, fomenta la **colaboración** y desarrolla **competencias digitales**. No obstante, se deben considerar riesgos de seguridad y dependencia tecnológica.
";
